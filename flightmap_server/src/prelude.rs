pub use crate::{
    self_crate, asset_uri, proxy_uri, js_module_path,
    spa::{MapServer, MapServerConfig, ServerHandle, ServerMsg, SpaComponents, SpaConnection, SpaServerState, SpaService, SpaServiceListBuilder},
    ws::{WsMsg, WsService},
    map_service::MapService,
    errors::{FlightmapServerError, FlightmapServerResult}
};
