//! Field creation and lookup

use shared::{Field, FieldAttributes, FieldId};

use super::{ApiClient, Operation};
use crate::error::ClientResult;

impl ApiClient {
    /// Create a field record (`POST /fields`)
    ///
    /// Not idempotent: two calls with identical attributes create two fields.
    pub async fn create_field(&self, attributes: &FieldAttributes) -> ClientResult<Field> {
        attributes.validate()?;

        let operation = Operation::CreateField;
        let url = self.endpoint(operation, &["fields"])?;
        let field: Field = self
            .execute(operation, self.http_client.post(url).json(attributes))
            .await?;

        tracing::info!(field_id = %field.id, "Field created");
        Ok(field)
    }

    /// Read a field record by id (`GET /fields/{id}`)
    pub async fn get_field(&self, id: &FieldId) -> ClientResult<Field> {
        let operation = Operation::ReadField;
        let url = self.endpoint(operation, &["fields", id.as_str()])?;
        let field: Field = self.execute(operation, self.http_client.get(url)).await?;

        if &field.id != id {
            tracing::warn!(requested = %id, returned = %field.id, "Backend returned a different field id");
        }

        Ok(field)
    }
}
