//! Shared domain constants.

/// Content types accepted for video uploads. Fixed allow-list; requests with
/// any other declared type are rejected before the media store is contacted.
pub const ALLOWED_VIDEO_CONTENT_TYPES: [&str; 4] = [
    "video/mp4",
    "video/quicktime",
    "video/x-m4v",
    "video/webm",
];

/// Content types accepted for channel avatar and banner images.
pub const ALLOWED_IMAGE_CONTENT_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// A video carries at most this many tags; extra entries are dropped.
pub const MAX_TAGS_PER_VIDEO: usize = 2;
