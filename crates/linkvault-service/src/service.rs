use crate::error::{RedirectError, Result};
use crate::lookup;
use crate::params::{CreateParams, RedirectTarget, UpdateParams};
use crate::resolver::UniqueKeyResolver;
use linkvault_core::{
    sort_key, translate, RecordId, RecordStore, RedirectConfig, RequestContext, StorageField,
    UrlRecord, UrlRecordPatch,
};
use linkvault_generator::KeyGenerator;
use std::sync::Arc;
use tracing::{debug, info, warn};

const EXPIRY_FIELDS: [StorageField; 2] = [StorageField::Expiry, StorageField::TimeOfExpiry];

/// Create, read, update and delete of short URLs on top of a [`RecordStore`].
///
/// This service wraps a store and a [`KeyGenerator`] to handle:
/// - key generation with a storage availability check
/// - expiry conversion from minutes to an absolute timestamp
/// - translation between application and storage records
pub struct RedirectService<S, G> {
    store: Arc<S>,
    resolver: UniqueKeyResolver<S, G>,
    config: Arc<RedirectConfig>,
}

impl<S, G> Clone for RedirectService<S, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            resolver: self.resolver.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: RecordStore, G: KeyGenerator> RedirectService<S, G> {
    /// Creates a new `RedirectService`, refusing an inconsistent config.
    pub fn new(store: S, generator: G, config: RedirectConfig) -> Result<Self> {
        Self::with_shared(Arc::new(store), Arc::new(generator), Arc::new(config))
    }

    /// Like [`RedirectService::new`], for collaborators already shared elsewhere.
    pub fn with_shared(
        store: Arc<S>,
        generator: Arc<G>,
        config: Arc<RedirectConfig>,
    ) -> Result<Self> {
        config.validate()?;

        let resolver = UniqueKeyResolver::new(Arc::clone(&store), generator, Arc::clone(&config));

        Ok(Self {
            store,
            resolver,
            config,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &RedirectConfig {
        &self.config
    }

    /// Creates a short URL and returns the stored record.
    ///
    /// Without an explicit key a free one is generated first. The write itself
    /// is an unconditional put.
    pub async fn create(&self, ctx: &RequestContext, params: CreateParams) -> Result<UrlRecord> {
        let time_of_expiry = params
            .expiry
            .map(|minutes| ctx.expiry_after(minutes))
            .transpose()?;
        sort_key::check_part(&params.namespace_id)?;

        let key = match params.key {
            Some(key) => {
                sort_key::check_part(&key)?;
                key
            }
            None => {
                let length = self.config.key_length(params.key_length)?;
                self.resolver.resolve(&params.domain, length).await?
            }
        };

        let record = UrlRecord {
            namespace_id: params.namespace_id,
            domain: params.domain,
            key,
            original_link: params.original_link,
            link_expiry: params.expiry,
            supplementary_data: params.supplementary_data,
            time_of_creation: ctx.time(),
            time_of_expiry,
        };

        let stored = translate::to_storage(&record.to_patch());
        if !self.store.put(&self.config.table, stored).await? {
            warn!(domain = %record.domain, key = %record.key, "storage did not apply put");
            return Err(RedirectError::WriteFailed);
        }

        info!(
            domain = %record.domain,
            key = %record.key,
            namespace_id = %record.namespace_id,
            "created short url"
        );
        Ok(record)
    }

    /// Looks up `key` in `domain` regardless of namespace.
    ///
    /// Returns `None` if the key is not in use.
    pub async fn get_data(&self, domain: &str, key: &str) -> Result<Option<UrlRecord>> {
        let query = lookup::key_query(domain, key);
        let Some(stored) = lookup::find_first(&*self.store, &self.config.table, &query).await?
        else {
            debug!(domain, key, "short url not found");
            return Ok(None);
        };

        Ok(Some(translate::from_storage(&stored)?))
    }

    /// Returns the target link and supplementary data of `key`.
    pub async fn get_redirect_url(
        &self,
        domain: &str,
        key: &str,
    ) -> Result<Option<RedirectTarget>> {
        let mut query = lookup::key_query(domain, key);
        query.fields = Some(vec![
            StorageField::OriginalLink,
            StorageField::SupplementaryData,
        ]);

        let target = lookup::find_first(&*self.store, &self.config.table, &query)
            .await?
            .map(|stored| RedirectTarget {
                original_link: stored.original_link.unwrap_or_default(),
                supplementary_data: stored.supplementary_data,
            });
        Ok(target)
    }

    /// Applies a partial update to one record.
    ///
    /// Only the expiry and the supplementary data can change; everything else
    /// is left as stored. Fails with [`RedirectError::WriteFailed`] if the
    /// storage engine does not apply the update, e.g. for a missing record.
    pub async fn update_data(&self, ctx: &RequestContext, params: UpdateParams) -> Result<bool> {
        let id = RecordId::new(
            params.domain,
            sort_key::encode_checked(&params.key, &params.namespace_id)?,
        );

        let mut patch = UrlRecordPatch::default();
        let mut removed: &[StorageField] = &[];

        if params.remove_expiry {
            removed = &EXPIRY_FIELDS;
        } else if let Some(minutes) = params.expiry {
            patch.link_expiry = Some(minutes);
            patch.time_of_expiry = Some(ctx.expiry_after(minutes)?);
        }
        patch.supplementary_data = params.supplementary_data;

        let changed = translate::to_storage(&patch);
        if !self
            .store
            .update(&self.config.table, &id, changed, removed)
            .await?
        {
            warn!(record = %id, "storage did not apply update");
            return Err(RedirectError::WriteFailed);
        }

        info!(record = %id, remove_expiry = params.remove_expiry, "updated short url");
        Ok(true)
    }

    /// Deletes one record. Returns `false` if it did not exist.
    pub async fn delete_data(&self, namespace_id: &str, domain: &str, key: &str) -> Result<bool> {
        let id = RecordId::new(domain, sort_key::encode_checked(key, namespace_id)?);
        let deleted = self.store.delete(&self.config.table, &id).await?;

        info!(record = %id, deleted, "deleted short url");
        Ok(deleted)
    }

    /// Returns `true` if no namespace of `domain` uses `key`.
    pub async fn check_key_availability(&self, domain: &str, key: &str) -> Result<bool> {
        let taken = lookup::key_exists(&*self.store, &self.config.table, domain, key).await?;
        Ok(!taken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;
    use linkvault_core::{CoreError, SupplementaryData};
    use linkvault_generator::seq::SeqGenerator;
    use linkvault_generator::RandomKeyGenerator;
    use linkvault_storage::InMemoryStore;
    use serde_json::json;

    fn ctx() -> RequestContext {
        RequestContext::at(Timestamp::from_second(1_700_000_000).unwrap())
    }

    fn test_service() -> RedirectService<InMemoryStore, SeqGenerator> {
        RedirectService::new(
            InMemoryStore::new(),
            SeqGenerator::default(),
            RedirectConfig::default(),
        )
        .unwrap()
    }

    fn data(value: serde_json::Value) -> SupplementaryData {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    fn params(key: Option<&str>) -> CreateParams {
        CreateParams {
            namespace_id: "A".to_string(),
            domain: "l.co".to_string(),
            original_link: "https://x.test".to_string(),
            key_length: None,
            key: key.map(str::to_string),
            expiry: None,
            supplementary_data: None,
        }
    }

    #[tokio::test]
    async fn create_with_generated_key() {
        let service = RedirectService::new(
            InMemoryStore::new(),
            RandomKeyGenerator::default(),
            RedirectConfig::default(),
        )
        .unwrap();

        let record = service.create(&ctx(), params(None)).await.unwrap();

        assert_eq!(record.key.len(), 6);
        assert!(record
            .key
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_eq!(record.time_of_creation, ctx().time());
        assert_eq!(record.time_of_expiry, None);
        assert_eq!(record.namespace_id, "A");
    }

    #[tokio::test]
    async fn create_uses_requested_key_length() {
        let service = test_service();
        let params = CreateParams::builder()
            .namespace_id("A")
            .domain("l.co")
            .original_link("https://x.test")
            .key_length(9)
            .build();

        let record = service.create(&ctx(), params).await.unwrap();
        assert_eq!(record.key, "000000000");
    }

    #[tokio::test]
    async fn create_rejects_key_length_out_of_bounds() {
        let service = RedirectService::new(
            InMemoryStore::new(),
            RandomKeyGenerator::default(),
            RedirectConfig::default(),
        )
        .unwrap();

        for length in [40, usize::MAX] {
            let mut params = params(None);
            params.key_length = Some(length);

            let err = service.create(&ctx(), params).await.unwrap_err();
            assert!(matches!(
                err,
                RedirectError::Core(CoreError::InvalidKeyLength { .. })
            ));
            assert_eq!(err.code(), "INVALID_INPUT");
        }
        assert!(service.store().is_empty("url_redirect"));
    }

    #[tokio::test]
    async fn create_with_explicit_key() {
        let service = test_service();

        let record = service
            .create(&ctx(), params(Some("custom1")))
            .await
            .unwrap();
        assert_eq!(record.key, "custom1");

        // the sequential generator was never consulted
        let generated = service.create(&ctx(), params(None)).await.unwrap();
        assert_eq!(generated.key, "000000");
    }

    #[tokio::test]
    async fn create_with_expiry_sets_absolute_time() {
        let service = test_service();
        let mut params = params(None);
        params.expiry = Some(10);

        let record = service.create(&ctx(), params).await.unwrap();
        assert_eq!(record.link_expiry, Some(10));
        assert_eq!(
            record.time_of_expiry,
            Some(Timestamp::from_second(1_700_000_600).unwrap())
        );

        let stored = service.get_data("l.co", &record.key).await.unwrap().unwrap();
        assert_eq!(stored, record);
    }

    #[tokio::test]
    async fn create_rejects_negative_expiry() {
        let service = test_service();
        let mut params = params(None);
        params.expiry = Some(-1);

        let err = service.create(&ctx(), params).await.unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT");
        assert!(service.store().is_empty("url_redirect"));
    }

    #[tokio::test]
    async fn create_rejects_delimiter_in_namespace() {
        let service = test_service();
        let mut params = params(None);
        params.namespace_id = "brand&store".to_string();

        let err = service.create(&ctx(), params).await.unwrap_err();
        assert!(matches!(err, RedirectError::Core(_)));
    }

    #[tokio::test]
    async fn create_with_explicit_key_overwrites() {
        let service = test_service();
        service
            .create(&ctx(), params(Some("custom1")))
            .await
            .unwrap();

        let mut second = params(Some("custom1"));
        second.original_link = "https://y.test".to_string();
        service.create(&ctx(), second).await.unwrap();

        let record = service.get_data("l.co", "custom1").await.unwrap().unwrap();
        assert_eq!(record.original_link, "https://y.test");
        assert_eq!(service.store().len("url_redirect"), 1);
    }

    #[tokio::test]
    async fn get_data_finds_key_in_any_namespace() {
        let service = test_service();
        service
            .create(&ctx(), params(Some("abc123")))
            .await
            .unwrap();

        let record = service.get_data("l.co", "abc123").await.unwrap().unwrap();
        assert_eq!(record.namespace_id, "A");
        assert_eq!(record.domain, "l.co");
        assert_eq!(record.original_link, "https://x.test");
    }

    #[tokio::test]
    async fn get_data_missing_key() {
        let service = test_service();
        assert!(service.get_data("l.co", "abc123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_redirect_url_projects_link_and_data() {
        let service = test_service();
        let mut params = params(Some("abc123"));
        params.supplementary_data = Some(data(json!({ "campaign": "spring" })));
        service.create(&ctx(), params).await.unwrap();

        let target = service
            .get_redirect_url("l.co", "abc123")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(target.original_link, "https://x.test");
        assert_eq!(
            target.supplementary_data,
            Some(data(json!({ "campaign": "spring" })))
        );
    }

    #[tokio::test]
    async fn get_redirect_url_missing_key() {
        let service = test_service();
        assert_eq!(service.get_redirect_url("l.co", "abc123").await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_sets_expiry_and_data() {
        let service = test_service();
        service
            .create(&ctx(), params(Some("abc123")))
            .await
            .unwrap();

        let later = RequestContext::at(Timestamp::from_second(1_700_001_000).unwrap());
        let update = UpdateParams::builder()
            .namespace_id("A")
            .domain("l.co")
            .key("abc123")
            .expiry(5)
            .supplementary_data(data(json!({ "v": 2 })))
            .build();
        assert!(service.update_data(&later, update).await.unwrap());

        let record = service.get_data("l.co", "abc123").await.unwrap().unwrap();
        assert_eq!(record.link_expiry, Some(5));
        assert_eq!(
            record.time_of_expiry,
            Some(Timestamp::from_second(1_700_001_300).unwrap())
        );
        assert_eq!(record.supplementary_data, Some(data(json!({ "v": 2 }))));
        assert_eq!(record.original_link, "https://x.test");
        assert_eq!(record.time_of_creation, ctx().time());
    }

    #[tokio::test]
    async fn update_remove_expiry_wins_over_new_expiry() {
        let service = test_service();
        let mut params = params(Some("abc123"));
        params.expiry = Some(10);
        service.create(&ctx(), params).await.unwrap();

        let update = UpdateParams::builder()
            .namespace_id("A")
            .domain("l.co")
            .key("abc123")
            .expiry(30)
            .remove_expiry(true)
            .build();
        assert!(service.update_data(&ctx(), update).await.unwrap());

        let record = service.get_data("l.co", "abc123").await.unwrap().unwrap();
        assert_eq!(record.link_expiry, None);
        assert_eq!(record.time_of_expiry, None);
    }

    #[tokio::test]
    async fn update_missing_record_fails_to_write() {
        let service = test_service();
        let update = UpdateParams::builder()
            .namespace_id("A")
            .domain("l.co")
            .key("abc123")
            .expiry(5)
            .build();

        let err = service.update_data(&ctx(), update).await.unwrap_err();
        assert!(matches!(err, RedirectError::WriteFailed));
    }

    #[tokio::test]
    async fn update_is_scoped_to_namespace() {
        let service = test_service();
        service
            .create(&ctx(), params(Some("abc123")))
            .await
            .unwrap();

        let update = UpdateParams::builder()
            .namespace_id("B")
            .domain("l.co")
            .key("abc123")
            .expiry(5)
            .build();
        assert!(service.update_data(&ctx(), update).await.is_err());
    }

    #[tokio::test]
    async fn delete_existing_and_missing() {
        let service = test_service();
        service
            .create(&ctx(), params(Some("abc123")))
            .await
            .unwrap();

        assert!(!service.delete_data("B", "l.co", "abc123").await.unwrap());
        assert!(service.delete_data("A", "l.co", "abc123").await.unwrap());
        assert!(service.get_data("l.co", "abc123").await.unwrap().is_none());
        assert!(!service.delete_data("A", "l.co", "abc123").await.unwrap());
    }

    #[tokio::test]
    async fn key_availability() {
        let service = test_service();
        assert!(service
            .check_key_availability("l.co", "abc123")
            .await
            .unwrap());

        service
            .create(&ctx(), params(Some("abc123")))
            .await
            .unwrap();

        assert!(!service
            .check_key_availability("l.co", "abc123")
            .await
            .unwrap());
        assert!(service
            .check_key_availability("m.co", "abc123")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn generated_keys_skip_taken_ones() {
        let service = test_service();
        service
            .create(&ctx(), params(Some("000000")))
            .await
            .unwrap();

        let record = service.create(&ctx(), params(None)).await.unwrap();
        assert_eq!(record.key, "000001");
    }

    #[test]
    fn invalid_config_is_refused() {
        let config = RedirectConfig::builder().max_key_attempts(0).build();
        let result = RedirectService::new(InMemoryStore::new(), SeqGenerator::default(), config);
        assert!(matches!(result, Err(RedirectError::Config(_))));
    }
}
