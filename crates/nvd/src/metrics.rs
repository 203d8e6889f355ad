//! Prometheus counters for field operations.

use prometheus_client::{
    metrics::counter::Counter,
    registry::Registry,
};

#[derive(Clone)]
pub struct FieldMetrics {
    pub fields_encrypted: Counter,
    pub fields_decrypted: Counter,
    pub encrypt_failures: Counter,
    pub decrypt_failures: Counter,
}

impl FieldMetrics {
    pub fn new(registry: &mut Registry) -> Self {
        let fields_encrypted = Counter::default();
        let fields_decrypted = Counter::default();
        let encrypt_failures = Counter::default();
        let decrypt_failures = Counter::default();

        registry.register(
            "nv_fields_encrypted",
            "Fields encrypted successfully",
            fields_encrypted.clone(),
        );
        registry.register(
            "nv_fields_decrypted",
            "Fields decrypted successfully",
            fields_decrypted.clone(),
        );
        registry.register(
            "nv_encrypt_failures",
            "Field encryption failures (request rejected)",
            encrypt_failures.clone(),
        );
        registry.register(
            "nv_decrypt_failures",
            "Field decryption failures (sentinel substituted or request rejected)",
            decrypt_failures.clone(),
        );

        FieldMetrics {
            fields_encrypted,
            fields_decrypted,
            encrypt_failures,
            decrypt_failures,
        }
    }
}
