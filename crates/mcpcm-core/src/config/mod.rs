//! Agent configuration files: codecs, server extraction, merging and the
//! read-modify-write store built on top of them.

pub mod codec;
pub mod merge;
pub mod paths;
pub mod servers;
pub mod store;

pub use codec::{ConfigDocument, ConfigFormat, DocumentCodec, codec_for_format};
pub use merge::{merge_servers, remove_servers, split_existing};
pub use paths::{config_path_for_scope, expand_home, expand_home_in};
pub use servers::{
    DEFAULT_SERVERS_KEY, ServerDefinition, ServerMapping, extract_servers, inject_servers,
    is_server_definition, parse_server_input,
};
pub use store::{ConfigStore, ReadResult, WriteResult, read_config_file, write_config_file};
