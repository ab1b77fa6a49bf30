
pub mod bugreport;
pub mod client;
pub mod version;

pub const UPLOAD_SUBCOMMAND: &str = "upload";
pub const UPLOAD_DESCRIPTION: &str = "Upload an image to the photo store";

pub const SEARCH_SUBCOMMAND: &str = "search";
pub const SEARCH_DESCRIPTION: &str = "Search uploaded images by keyword";

pub const CONFIG_SUBCOMMAND: &str = "config";
pub const CONFIG_DESCRIPTION: &str = "Show the resolved configuration and transport mode";

pub const VERSION_SUBCOMMAND: &str = "version";
pub const VERSION_DESCRIPTION: &str = "Display the version and build information";

pub const BUGREPORT_SUBCOMMAND: &str = "bugreport";
pub const BUGREPORT_DESCRIPTION: &str = "Collect diagnostic information for a bug report";
