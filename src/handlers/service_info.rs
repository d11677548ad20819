use crate::files::FileKind;
use crate::naming::CHROMOSOME_PREFIX;
use crate::types::ServiceInfo;
use axum::Json;

pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        id: "org.example.contigq".to_string(),
        name: "contigq".to_string(),
        description: Some(
            "Chromosome-name tolerant queries over tabix-indexed feature files".to_string(),
        ),
        version: env!("CARGO_PKG_VERSION").to_string(),
        kinds: FileKind::ALL.to_vec(),
        chromosome_prefix: CHROMOSOME_PREFIX.to_string(),
    })
}
