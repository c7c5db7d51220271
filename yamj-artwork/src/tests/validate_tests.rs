use super::*;
use crate::test_support::{FakeFetcher, png_bytes};
use yamj_core::{ArtworkKind, PropertySet};

fn settings(kind: ArtworkKind) -> ArtworkSettings {
    ArtworkSettings::from_properties(kind, &PropertySet::new())
}

#[test]
fn test_thresholds_from_match_percent() {
    let policy = SizePolicy::from_settings(&settings(ArtworkKind::Poster));
    assert_eq!(policy.thresholds(), (300, 450));
}

#[test]
fn test_thresholds_large_dimensions() {
    let mut policy = SizePolicy::from_settings(&settings(ArtworkKind::Poster));
    policy.width = u32::MAX;
    policy.height = 100_000_000;
    assert_eq!(policy.thresholds(), (3_221_225_471, 75_000_000));

    policy.match_percent = 200;
    assert_eq!(policy.thresholds().0, u32::MAX);
}

#[test]
fn test_candidate_at_threshold_passes() {
    let policy = SizePolicy::from_settings(&settings(ArtworkKind::Poster));
    assert_eq!(check_dimensions(300, 450, &policy), Ok(()));
    assert_eq!(
        check_dimensions(299, 450, &policy),
        Err(Rejection::TooNarrow { width: 299, min: 300 })
    );
}

#[test]
fn test_short_candidate_rejected_on_height() {
    let policy = SizePolicy::from_settings(&settings(ArtworkKind::Poster));
    assert_eq!(
        check_dimensions(300, 200, &policy),
        Err(Rejection::TooShort { height: 200, min: 450 })
    );
}

#[test]
fn test_orientation_check() {
    let mut policy = SizePolicy::from_settings(&settings(ArtworkKind::Fanart));
    assert_eq!(
        check_dimensions(1000, 1200, &policy),
        Err(Rejection::WrongOrientation {
            width: 1000,
            height: 1200
        })
    );
    policy.enforce_aspect = false;
    assert_eq!(check_dimensions(1000, 1200, &policy), Ok(()));
}

#[test]
fn test_any_orientation_accepts_both() {
    let policy = SizePolicy::from_settings(&settings(ArtworkKind::MovieDisc));
    assert_eq!(check_dimensions(500, 500, &policy), Ok(()));
    assert_eq!(check_dimensions(600, 400, &policy), Ok(()));
}

#[tokio::test]
async fn test_validator_reads_remote_header() {
    let fetcher = Arc::new(FakeFetcher::new());
    fetcher.serve("http://img/big.png", png_bytes(400, 600));
    fetcher.serve("http://img/small.png", png_bytes(300, 200));
    let validator = Validator::new(fetcher.clone());
    let poster = settings(ArtworkKind::Poster);

    assert!(
        validator
            .validate(&ArtworkLocation::parse("http://img/big.png"), &poster)
            .await
            .is_ok()
    );
    assert!(matches!(
        validator
            .validate(&ArtworkLocation::parse("http://img/small.png"), &poster)
            .await,
        Err(Rejection::TooShort { .. })
    ));
    assert!(matches!(
        validator
            .validate(&ArtworkLocation::parse("http://img/missing.png"), &poster)
            .await,
        Err(Rejection::Unreadable(_))
    ));
}

#[tokio::test]
async fn test_validation_disabled_skips_header_read() {
    let fetcher = Arc::new(FakeFetcher::new());
    let validator = Validator::new(fetcher.clone());
    let mut poster = settings(ArtworkKind::Poster);
    poster.validate = false;

    let result = validator
        .validate(&ArtworkLocation::parse("http://img/unknown.png"), &poster)
        .await;
    assert!(result.is_ok());
    assert_eq!(fetcher.network_calls(), 0);
}
