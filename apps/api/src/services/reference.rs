//! Categories, sale channels and purchase channels.

use tracing::info;

use revenda_core::validation::validate_reference_name;
use revenda_core::{ReferenceItem, ReferenceKind};
use revenda_db::Database;

use crate::error::ApiResult;

/// One contract for the three reference kinds.
pub struct ReferenceService {
    db: Database,
}

impl ReferenceService {
    pub fn new(db: Database) -> Self {
        ReferenceService { db }
    }

    pub async fn list(&self, user_id: &str, kind: ReferenceKind) -> ApiResult<Vec<ReferenceItem>> {
        Ok(self.db.reference(kind).list(user_id).await?)
    }

    pub async fn create(
        &self,
        user_id: &str,
        kind: ReferenceKind,
        name: &str,
    ) -> ApiResult<ReferenceItem> {
        validate_reference_name(name)?;

        let item = self.db.reference(kind).create(user_id, name).await?;
        info!(kind = %kind, id = %item.id, "Reference item created");
        Ok(item)
    }

    pub async fn delete(&self, user_id: &str, kind: ReferenceKind, id: &str) -> ApiResult<()> {
        self.db.reference(kind).delete(user_id, id).await?;
        info!(kind = %kind, id = %id, "Reference item deleted");
        Ok(())
    }
}
