use crate::proto::InputFile;
use compact_str::CompactString;
use std::collections::HashMap;

/// Form field name to the file sent under it.
pub type Files = HashMap<CompactString, InputFile>;

/// Implemented by requests that may carry uploads.
pub trait GetFiles {
    fn get_files(&self) -> Files;

    fn any_need_upload(&self) -> bool {
        self.get_files().values().any(|file| file.need_upload())
    }

    /// Only the files that must travel as multipart parts.
    fn uploads(&self) -> Files {
        self.get_files()
            .into_iter()
            .filter(|(_, file)| file.need_upload())
            .collect()
    }
}
