use super::AppState;
use crate::{
    Error, Result,
    features::{FeatureRecord, FeatureSource},
    files::{FeatureFile, FileKind},
    formats::TabixFeatureSource,
    naming::canonical_name,
    query::tolerant_query,
    sorted::SortedExt,
    timing::debug_time,
    types::{Chromosome, ContigResponse, FeaturesQuery, FeaturesResponse, KindQuery, UrlFeaturesQuery},
};
use axum::{
    Json,
    extract::{Path, Query, State},
};

/// Default end of an open-ended interval
const MAX_END: u64 = u32::MAX as u64;

pub async fn get_features(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<FeaturesQuery>,
) -> Result<Json<FeaturesResponse<FeatureRecord>>> {
    let kind = query.kind.unwrap_or_default();
    let file = state.storage.feature_file(&id, kind).await?;

    query_features(&state, file, query.reference_name, query.start, query.end).await
}

/// Query a file that is not registered with the storage backend.
pub async fn get_url_features(
    State(state): State<AppState>,
    Query(query): Query<UrlFeaturesQuery>,
) -> Result<Json<FeaturesResponse<FeatureRecord>>> {
    for url in [&query.url, &query.index_url] {
        url::Url::parse(url)
            .map_err(|e| Error::InvalidInput(format!("invalid URL {}: {}", url, e)))?;
    }

    let kind = query
        .kind
        .or_else(|| FileKind::from_file_name(&query.url))
        .ok_or_else(|| Error::UnsupportedFormat(format!("cannot detect kind of {}", query.url)))?;

    let mut chromosome = Chromosome::new(query.reference_name.clone());
    chromosome.reference_id = query.reference_id;
    let file = FeatureFile::non_registered(kind, &query.url, &query.index_url, &chromosome);

    query_features(&state, file, query.reference_name, query.start, query.end).await
}

/// Resolve a chromosome name against the contigs of a file's index.
pub async fn get_contig(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
    Query(query): Query<KindQuery>,
) -> Result<Json<ContigResponse>> {
    let kind = query.kind.unwrap_or_default();
    let file = state.storage.feature_file(&id, kind).await?;
    let local = state.cache.materialize(&file).await?;

    let names = tokio::task::spawn_blocking(move || {
        TabixFeatureSource::open(&local.data, &local.index, kind).map(|s| s.contig_names())
    })
    .await
    .map_err(|e| Error::Internal(format!("failed to read index: {}", e)))??;

    let canonical = canonical_name(&names, &name)
        .ok_or_else(|| Error::NotFound(format!("reference sequence not found: {}", name)))?
        .to_string();

    Ok(Json(ContigResponse {
        reference_name: name,
        canonical,
    }))
}

async fn query_features(
    state: &AppState,
    file: FeatureFile,
    reference_name: String,
    start: Option<u64>,
    end: Option<u64>,
) -> Result<Json<FeaturesResponse<FeatureRecord>>> {
    let (start, end) = interval(start, end)?;
    let local = state.cache.materialize(&file).await?;
    let kind = file.kind;

    let response = tokio::task::spawn_blocking(move || {
        debug_time("feature query", || -> Result<_> {
            let source = TabixFeatureSource::open(&local.data, &local.index, kind)?;
            let cursor = tolerant_query(&source, &reference_name, start, end)?;
            let queried_name = cursor.queried_name().to_string();
            let features = cursor
                .check_sorted(source.name())
                .collect::<Result<Vec<_>>>()?;

            Ok(FeaturesResponse {
                reference_name,
                queried_name,
                start,
                end,
                features,
            })
        })
    })
    .await
    .map_err(|e| Error::Internal(format!("feature query failed: {}", e)))??;

    Ok(Json(response))
}

/// Fill in defaults for an optional 1-based closed interval.
fn interval(start: Option<u64>, end: Option<u64>) -> Result<(u64, u64)> {
    let start = start.unwrap_or(1);
    let end = end.unwrap_or(MAX_END);

    if start == 0 {
        return Err(Error::InvalidRange("start must be at least 1".to_string()));
    }
    if start > end {
        return Err(Error::InvalidRange(format!(
            "start {} is greater than end {}",
            start, end
        )));
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_defaults() {
        assert_eq!(interval(None, None).unwrap(), (1, MAX_END));
        assert_eq!(interval(Some(10), Some(10)).unwrap(), (10, 10));
    }

    #[test]
    fn test_interval_rejects_bad_ranges() {
        assert!(matches!(interval(Some(0), None), Err(Error::InvalidRange(_))));
        assert!(matches!(
            interval(Some(20), Some(10)),
            Err(Error::InvalidRange(_))
        ));
    }
}
