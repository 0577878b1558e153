use super::*;

fn session(display_name: Option<&str>) -> Session {
    Session {
        uid: "u1".to_owned(),
        email: "a@b.com".to_owned(),
        display_name: display_name.map(str::to_owned),
        id_token: "tok".to_owned(),
        refresh_token: "ref".to_owned(),
        expires_at_ms: 1_000,
    }
}

#[test]
fn session_label_prefers_display_name() {
    assert_eq!(session(Some("Ada")).label(), "Ada");
}

#[test]
fn session_label_falls_back_to_user() {
    assert_eq!(session(None).label(), "User");
    assert_eq!(session(Some("   ")).label(), "User");
}

#[test]
fn session_expiry_is_inclusive() {
    let s = session(None);
    assert!(!s.is_expired(999));
    assert!(s.is_expired(1_000));
}

#[test]
fn summary_blocks_split_on_blank_lines() {
    let result = HospitalResult::Summary("City Hospital\nPhone: 555-1234\n\nGeneral\nPhone: 555-9999\n".to_owned());
    assert_eq!(
        result.blocks(),
        vec![
            vec!["City Hospital".to_owned(), "Phone: 555-1234".to_owned()],
            vec!["General".to_owned(), "Phone: 555-9999".to_owned()],
        ]
    );
}

#[test]
fn summary_blocks_skip_empty_blocks() {
    let result = HospitalResult::Summary("\n\n\n\nOnly\n\n".to_owned());
    assert_eq!(result.blocks(), vec![vec!["Only".to_owned()]]);
}

#[test]
fn hospital_blocks_list_present_fields_only() {
    let result = HospitalResult::Hospitals(vec![Hospital {
        name: "Mercy".to_owned(),
        formatted_address: Some("1 Main St".to_owned()),
        phone: None,
        rating: Some(4.3),
        website: None,
    }]);
    assert_eq!(
        result.blocks(),
        vec![vec!["Mercy".to_owned(), "Address: 1 Main St".to_owned(), "Rating: 4.3".to_owned()]]
    );
}

#[test]
fn hospital_deserializes_with_missing_optionals() {
    let hospital: Hospital = serde_json::from_str(r#"{"name":"Mercy"}"#).unwrap();
    assert_eq!(hospital.name, "Mercy");
    assert!(hospital.phone.is_none());
    assert!(hospital.rating.is_none());
}

#[test]
fn coordinates_reject_out_of_range() {
    assert_eq!(Coordinates::new(91.0, 0.0), Err(ValidationError::InvalidCoordinates));
    assert_eq!(Coordinates::new(0.0, -180.5), Err(ValidationError::InvalidCoordinates));
    assert_eq!(Coordinates::new(f64::NAN, 0.0), Err(ValidationError::InvalidCoordinates));
}

#[test]
fn coordinates_query_is_comma_joined() {
    let coords = Coordinates::new(17.3526, 78.5555).unwrap();
    assert_eq!(coords.to_query(), "17.3526,78.5555");
}
