//! Content extraction: HTML-to-text, embed resolution, file-format dispatch

pub mod embed;
pub mod formats;
pub mod html;
pub mod webpage;

pub use embed::{lookup_uuid, resolve_direct};
pub use formats::{ExtractError, ExtractorSet, FileKind};
pub use html::{extract_html, ExtractedHtml};
pub use webpage::WebPageLoader;
