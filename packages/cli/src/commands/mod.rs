pub mod init;
pub mod list;
pub mod new;
pub mod preview;
pub mod session;
pub mod set;
pub mod show;
pub mod watch;

pub use init::{init, InitArgs};
pub use list::list;
pub use new::new;
pub use preview::{preview, PreviewArgs};
pub use session::Session;
pub use set::{set, SetArgs};
pub use show::{show, ShowArgs};
pub use watch::watch;
