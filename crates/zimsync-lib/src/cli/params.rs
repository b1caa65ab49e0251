use crate::config::HttpConfig;
use crate::transfer::Denylist;
use std::path::PathBuf;
use url::Url;

#[derive(Debug, Clone)]
pub struct SyncParams {
    pub source_url: Url,
    pub output_dir: PathBuf,
    pub denylist: Denylist,
    pub http: HttpConfig,
    pub dry_run: bool,
}
