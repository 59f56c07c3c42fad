// This example shows how to use serde feature to serialize the interface list to JSON.
fn main() {
    match inetif::get_interfaces() {
        Ok(interfaces) => match serde_json::to_string_pretty(&interfaces) {
            Ok(json) => {
                println!("{}", json);
            }
            Err(e) => {
                println!("{}", e);
            }
        },
        Err(e) => {
            println!("{}", e);
        }
    }
}
