//! Concrete native-task handlers. These are an external collaborator to the
//! core per the queue design (the core only dispatches by payload schema);
//! kept here as thin, swappable implementations rather than a hard
//! dependency the dispatcher's tests rely on.

pub mod download_file;
pub mod send_email;

pub use download_file::DownloadFileHandler;
pub use send_email::SendEmailHandler;
