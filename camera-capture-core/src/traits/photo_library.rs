use crate::models::captured_image::PhotoData;

/// Filter for the kinds of assets a library picker should offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LibraryFilter {
    /// Still images only.
    #[default]
    Images,
}

/// One-shot completion for a library pick: the chosen image, or `None` if
/// the user dismissed the picker without choosing.
pub type LibraryPickCallback = Box<dyn FnOnce(Option<PhotoData>) + Send + 'static>;

/// External photo library boundary.
///
/// The capture kit does not browse the user's photos itself; embedding
/// applications provide access through this trait as the fallback input
/// path next to live capture. Picks are single-selection: zero or one
/// image per invocation.
pub trait PhotoLibrary: Send + Sync {
    /// Present the picker and deliver at most one image.
    fn pick_image(&self, filter: LibraryFilter, on_complete: LibraryPickCallback);
}
