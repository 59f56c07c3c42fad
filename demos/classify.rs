// This example parses the addresses given on the command line and prints their classification.
use inetif::InetAddress;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("usage: classify <address>...");
        std::process::exit(2);
    }
    for arg in args {
        let addr = match arg.parse::<InetAddress>() {
            Ok(addr) => addr,
            Err(e) => {
                println!("{}: {}", arg, e);
                continue;
            }
        };
        println!("{} ({})", addr, addr.family());
        println!("\tany local: {}", addr.is_any_local());
        println!("\tloopback: {}", addr.is_loopback());
        println!("\tlink local: {}", addr.is_link_local());
        println!("\tsite local: {}", addr.is_site_local());
        println!("\tmulticast: {}", addr.is_multicast());
        if addr.is_multicast() {
            println!("\t\tglobal: {}", addr.is_multicast_global());
            println!("\t\tnode local: {}", addr.is_multicast_node_local());
            println!("\t\tlink local: {}", addr.is_multicast_link_local());
            println!("\t\tsite local: {}", addr.is_multicast_site_local());
            println!("\t\torg local: {}", addr.is_multicast_org_local());
        }
        println!("\tipv4 compatible: {}", addr.is_ipv4_compatible());
    }
}
