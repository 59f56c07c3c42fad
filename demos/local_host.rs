// This example prints the first non-loopback address of this host and the interface that owns it.
use inetif::{BackendKind, InetAddress, Registry};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Backend: {}", Registry::system().backend_name());
    match InetAddress::local_host() {
        Ok(addr) => {
            println!("Local host: {}", addr);
            match inetif::get_interface_by_address(&addr) {
                Ok(Some(interface)) => println!("Interface: {}", interface),
                Ok(None) => println!("Interface: (Not found)"),
                Err(e) => println!("Error: {}", e),
            }
        }
        Err(e) => println!("Error: {}", e),
    }

    // The ioctl backend only reports IPv4 addresses.
    if let Some(registry) = Registry::with_kind(BackendKind::IfConf) {
        match registry.local_host() {
            Ok(addr) => println!("Local host ({}): {}", BackendKind::IfConf, addr),
            Err(e) => println!("Error ({}): {}", BackendKind::IfConf, e),
        }
    }
}
