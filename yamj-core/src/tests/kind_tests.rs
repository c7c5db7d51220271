use super::*;

#[test]
fn test_table_order_matches_enum() {
    for kind in ArtworkKind::ALL {
        assert_eq!(kind.spec().kind, kind);
    }
}

#[test]
fn test_parse_case_insensitive() {
    assert_eq!("Fanart".parse::<ArtworkKind>(), Ok(ArtworkKind::Fanart));
    assert_eq!(" videoimage ".parse::<ArtworkKind>(), Ok(ArtworkKind::VideoImage));
    assert!("cover".parse::<ArtworkKind>().is_err());
}

#[test]
fn test_display_round_trips_through_name() {
    for kind in ArtworkKind::ALL {
        assert_eq!(kind.to_string().parse::<ArtworkKind>(), Ok(kind));
    }
}

#[test]
fn test_poster_has_empty_token() {
    assert_eq!(ArtworkKind::Poster.spec().token, "");
    assert_eq!(ArtworkKind::Fanart.spec().token, ".fanart");
}

#[test]
fn test_transparent_kinds_default_to_png() {
    assert_eq!(ArtworkKind::ClearLogo.spec().format, "png");
    assert_eq!(ArtworkKind::Poster.spec().format, "jpg");
}

#[test]
fn test_force_overwrite_key() {
    assert_eq!(
        ArtworkKind::VideoImage.force_overwrite_key(),
        "mjb.forceVideoImageOverwrite"
    );
}
