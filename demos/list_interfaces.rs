use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let interfaces = match inetif::get_interfaces() {
        Ok(interfaces) => interfaces,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    for interface in interfaces {
        println!("Interface");
        println!("\tIndex: {}", interface.index);
        println!("\tName: {}", interface.name);
        for addr in &interface.addresses {
            println!("\tAddress: {} ({})", addr.unicast, addr.unicast.family());
            if let Some(netmask) = addr.netmask {
                println!("\t\tNetmask: {}", netmask);
            }
            if let Some(broadcast) = addr.broadcast {
                println!("\t\tBroadcast: {}", broadcast);
            }
            if let Some(net) = addr.network() {
                println!("\t\tNetwork: {}", net.trunc());
            }
        }
        println!();
    }
}
