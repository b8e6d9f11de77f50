use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const UPLOADS_DIR_NAME: &str = "uploads";

pub const DEFAULT_LISTEN: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000);

/// Read buffer used by `GET /chunked/*`
pub const CHUNK_SIZE: usize = 1024;

pub const UPLOAD_OK_BODY: &str = "OK!";
