/*
 * Copyright © 2025, the flightmap project contributors. All rights reserved.
 *
 * The "flightmap" software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */
#![allow(unused)]

//! the live flight map application: a map server with the flight layer service, fed by the
//! FlightRadar24 style importer. Configured through `server.ron` and `fr24.ron` with host/port
//! overridable from the command line

use std::net::IpAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use flightmap_fr24::{client::Fr24Config, importer::LiveFr24Importer, FlightsService};
use flightmap_server::prelude::*;

#[derive(Parser)]
#[command(version, about="live flight map for a configured zone and airline selection")]
struct Cli {
    /// address to serve on (overrides config)
    #[arg(long)]
    host: Option<IpAddr>,

    /// port to serve on (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// log at debug level (RUST_LOG still takes precedence)
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main ()->Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new( default_level)))
        .init();

    let mut server_config: MapServerConfig = flightmap_server::load_config( "server.ron")?;
    if let Some(host) = cli.host { server_config.sock_addr.set_ip( host) }
    if let Some(port) = cli.port { server_config.sock_addr.set_port( port) }

    let fr24_config: Arc<Fr24Config> = Arc::new( flightmap_fr24::load_config( "fr24.ron")?);
    info!("tracking zone '{}' every {:?}", fr24_config.zone, fr24_config.update_interval);

    let importer = LiveFr24Importer::new( fr24_config)?;

    let url = server_config.url();
    let server = MapServer::new( server_config, "flightmap",
        SpaServiceListBuilder::new().add( {
            let last_tree = importer.shared_tree();
            move || FlightsService::new( last_tree)
        })
    );

    let importer_task = importer.spawn( server.handle());

    info!("serving {url}/flightmap");
    server.run().await?;

    importer_task.abort();
    Ok(())
}
