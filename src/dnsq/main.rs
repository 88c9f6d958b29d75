//! A DNS resource query tool driving the resolver engine.
use std::fs;

use log::{debug, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use netdns::{
    config::ResolverConfig,
    error::DNSResult,
    resolver::Resolver,
    rfc1035::{QClass, QType},
};

mod args;
use args::CliOptions;

mod display;
use display::display_response;

fn main() -> DNSResult<()> {
    // manage arguments from command line
    let options = CliOptions::options()?;

    let level = if options.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)?;
    debug!("options: {:?}", &options);

    // a server from the command line wins; otherwise fall back to the
    // system resolv.conf
    let mut config = ResolverConfig::default();
    config.use_tcp = options.tcp;
    config.dnssec = options.dnssec;
    config.timeout = options.timeout;

    match &options.ns {
        Some(ns) => config.add_nameserver(ns)?,
        None => {
            let text = fs::read_to_string("/etc/resolv.conf")?;
            config.use_resolv_options = true;
            config.read_resolv_text(&text)?;
        }
    }
    debug!("config: {:?}", &config);

    let mut resolver = Resolver::new(config)?;

    let response = if options.qtype == QType::AXFR {
        resolver.axfr(&options.domain)?
    } else {
        resolver.query(&options.domain, options.qtype, QClass::IN)?
    };

    display_response(&response);
    Ok(())
}
