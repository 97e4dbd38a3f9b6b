//! Round-Robin Cursor Repository Port

use async_trait::async_trait;

use crate::domain::{EngineError, Language, RoundRobinCursor};

#[async_trait]
pub trait CursorRepository: Send + Sync {
    /// Active rotation record for a language. Written by admin
    /// configuration, read here.
    async fn find_by_language(
        &self,
        language: Language,
    ) -> Result<Option<RoundRobinCursor>, EngineError>;

    /// Compare-and-advance: move the cursor from `expected` to `next`
    /// only if nobody advanced it in between. A lost race returns
    /// `false`; the caller's assignment stands either way, cursor drift
    /// is tolerated where capacity overrun is not.
    async fn try_advance(
        &self,
        language: Language,
        expected: i32,
        next: i32,
    ) -> Result<bool, EngineError>;
}
