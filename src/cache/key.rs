//! Cache key for converted drawings
//!
//! A key is the (article, version) pair a drawing is requested by. A handful
//! of keys with non-positive articles are reserved for placeholder images that
//! the pipeline serves instead of a real conversion.

use std::fmt;

/// Identifies one artifact in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub article: i32,
    pub version: i32,
}

impl CacheKey {
    /// Placeholder served when the document store returns no bytes.
    pub const EMPTY_SOURCE: CacheKey = CacheKey::new(0, 0);

    /// Placeholder served when the rasterizer cannot load the drawing.
    pub const LOAD_FAILURE: CacheKey = CacheKey::new(-1, 0);

    /// Placeholder served for any other conversion failure.
    pub const UNEXPECTED_FAILURE: CacheKey = CacheKey::new(-2, 0);

    /// All reserved keys, in seeding order.
    pub const SENTINELS: [CacheKey; 3] = [
        CacheKey::EMPTY_SOURCE,
        CacheKey::LOAD_FAILURE,
        CacheKey::UNEXPECTED_FAILURE,
    ];

    pub const fn new(article: i32, version: i32) -> Self {
        Self { article, version }
    }

    /// Returns true for the reserved placeholder keys.
    pub fn is_sentinel(&self) -> bool {
        Self::SENTINELS.contains(self)
    }

    /// File name of the artifact inside the flat cache directory.
    pub fn file_name(&self) -> String {
        format!("{}-{}.png", self.article, self.version)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.article, self.version)
    }
}

impl From<(i32, i32)> for CacheKey {
    fn from((article, version): (i32, i32)) -> Self {
        Self::new(article, version)
    }
}
