use super::*;

fn fader(fade_out: bool) -> VisibilityFader {
    VisibilityFader::new(
        ["hero", "features", "footer"],
        FadeOptions {
            fade_out,
            ..FadeOptions::default()
        },
    )
    .unwrap()
}

#[test]
fn crossing_threshold_shows_section_once() {
    let mut f = fader(false);
    assert_eq!(f.update("hero", 0.05).unwrap(), VisibilityChange::Unchanged);
    assert_eq!(f.is_visible("hero"), Some(false));

    assert_eq!(f.update("hero", 0.1).unwrap(), VisibilityChange::Shown);
    assert_eq!(f.update("hero", 0.8).unwrap(), VisibilityChange::Unchanged);
    assert_eq!(f.is_visible("hero"), Some(true));
    assert_eq!(f.visible_count(), 1);
}

#[test]
fn leaving_view_keeps_section_visible_by_default() {
    let mut f = fader(false);
    f.update("features", 0.5).unwrap();
    assert_eq!(f.update("features", 0.0).unwrap(), VisibilityChange::Unchanged);
    assert_eq!(f.update("features", 0.6).unwrap(), VisibilityChange::Unchanged);
    assert_eq!(f.is_visible("features"), Some(true));
}

#[test]
fn fade_out_hides_and_reshows() {
    let mut f = fader(true);
    assert_eq!(f.update("footer", 0.3).unwrap(), VisibilityChange::Shown);
    assert_eq!(f.update("footer", 0.02).unwrap(), VisibilityChange::Hidden);
    assert_eq!(f.update("footer", 0.0).unwrap(), VisibilityChange::Unchanged);
    assert_eq!(f.update("footer", 0.4).unwrap(), VisibilityChange::Shown);
}

#[test]
fn nan_fraction_counts_as_hidden() {
    let mut f = fader(false);
    assert_eq!(f.update("hero", f64::NAN).unwrap(), VisibilityChange::Unchanged);
    assert_eq!(f.is_visible("hero"), Some(false));
}

#[test]
fn unknown_and_duplicate_ids_are_rejected() {
    let mut f = fader(false);
    assert!(matches!(
        f.update("sidebar", 1.0),
        Err(ReelError::Validation(_))
    ));
    assert_eq!(f.is_visible("sidebar"), None);

    assert!(VisibilityFader::new(["a", "a"], FadeOptions::default()).is_err());
    assert!(
        VisibilityFader::new(
            ["a"],
            FadeOptions {
                threshold: 1.5,
                fade_out: false
            }
        )
        .is_err()
    );
}

#[test]
fn iter_preserves_registration_order() {
    let mut f = fader(false);
    f.update("footer", 1.0).unwrap();
    let seen: Vec<_> = f.iter().collect();
    assert_eq!(
        seen,
        vec![("hero", false), ("features", false), ("footer", true)]
    );
    assert_eq!(f.len(), 3);
}
