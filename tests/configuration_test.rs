use prime_share::{CoefficientPolicy, Config, ShamirError, ShamirShare};

#[test]
fn test_builder_defaults() {
    let shamir = ShamirShare::builder(5, 3).build().unwrap();
    assert_eq!(shamir.total_shares(), 5);
    assert_eq!(shamir.threshold(), 3);

    let shares = shamir.split(b"test secret").unwrap();
    assert_eq!(shares.len(), 5);
    assert_eq!(ShamirShare::reconstruct(&shares[..3]).unwrap(), b"test secret");
}

#[test]
fn test_builder_with_unrestricted_coefficients() {
    let config = Config::new().with_coefficient_policy(CoefficientPolicy::Unrestricted);

    let shamir = ShamirShare::builder(5, 3)
        .with_config(config)
        .build()
        .unwrap();

    let secret = b"legacy polynomial";
    let shares = shamir.split(secret).unwrap();
    assert_eq!(ShamirShare::reconstruct(&shares[2..]).unwrap(), secret);
}

#[test]
fn test_unrestricted_policy_on_empty_secret() {
    // GF(2): the unrestricted policy may produce a constant polynomial, and
    // reconstruction of the empty secret still succeeds.
    let config = Config::new().with_coefficient_policy(CoefficientPolicy::Unrestricted);
    let shamir = ShamirShare::builder(4, 4).with_config(config).build().unwrap();

    for _ in 0..8 {
        let shares = shamir.split(b"").unwrap();
        assert!(ShamirShare::reconstruct(&shares).unwrap().is_empty());
    }
}

#[test]
fn test_min_points_enforced_at_reconstruction() {
    let shamir = ShamirShare::builder(5, 3).build().unwrap();
    let secret = b"at least three";
    let shares = shamir.split(secret).unwrap();
    let config = Config::new().with_min_points(3).unwrap();

    assert!(matches!(
        ShamirShare::reconstruct_with_config(&shares[..1], &config),
        Err(ShamirError::InsufficientPoints { needed: 3, got: 1 })
    ));

    // The default configuration accepts any non-empty set
    assert!(ShamirShare::reconstruct(&shares[..1]).is_ok());

    assert_eq!(
        ShamirShare::reconstruct_with_config(&shares[1..4], &config).unwrap(),
        secret
    );
}

#[test]
fn test_invalid_min_points() {
    assert!(matches!(
        Config::new().with_min_points(0),
        Err(ShamirError::InvalidConfig(_))
    ));
}
