mod test_server;
mod test_utils;

pub use test_server::{GetMode, HeadMode, LoggedRequest, Route, TestServer};
pub use test_utils::{
    build_sync_params, create_test_config, file_size, init_tracing, setup_test_environment,
    sync_args,
};
