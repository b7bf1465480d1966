use relaybox::logger::*;

fn main() -> anyhow::Result<()> {
    let logger = Logger::new_bootstrap();
    trace!("bootstrap trace log (filtered out)");
    debug!("bootstrap debug log (filtered out)");
    info!("bootstrap info log");

    let config = LogConfig {
        filter: "relaybox=trace".to_string(),
    };
    logger.reload_from_config(&config)?;
    trace!("relay trace log");
    debug!("relay debug log");
    info!("relay info log");

    Ok(())
}
