use super::*;
use crate::rating::{rating_to_logit, ELO_SCALE_CONSTANT};
use crate::testing;
use assert_float_eq::*;

fn with_composer<R>(f: impl FnOnce(&Composer) -> R) -> R {
    let snapshot = testing::snapshot().with_population_quantiles().unwrap();
    let quantiles = snapshot.quantiles.clone().unwrap();
    let composer = Composer {
        snapshot: &snapshot,
        quantiles: &quantiles,
        elo_scale_constant: ELO_SCALE_CONSTANT,
    };
    f(&composer)
}

fn compose(
    composer: &Composer,
    c1: &str,
    c2: &str,
    scope: &Scope,
) -> Result<Posterior, EstimateError> {
    composer.compose(c1, c2, scope, composer.snapshot.matchups.get(c1, c2))
}

fn named(player: &str, opponent: &str) -> Scope {
    Scope::Player {
        player: player.into(),
        opponent: Opponent::Named(opponent.into()),
    }
}

fn population(player: &str, skill: AgainstSkillPolicy, rating: AgainstRatingPolicy) -> Scope {
    Scope::Player {
        player: player.into(),
        opponent: Opponent::Population(AgainstPolicy { skill, rating }),
    }
}

fn dist(posterior: Posterior) -> Gaussian {
    match posterior {
        Posterior::Dist(dist) => dist,
        other => panic!("expected a distribution, got {other:?}"),
    }
}

#[test]
fn global_is_the_matchup_prior() {
    with_composer(|composer| {
        let posterior = dist(compose(composer, "A", "B", &Scope::Global).unwrap());
        assert_float_absolute_eq!(0.4, posterior.mean(), 1e-12);
        assert_float_absolute_eq!(0.09, posterior.variance(), 1e-12);
    });
}

#[test]
fn named_opponent_with_equal_ratings() {
    with_composer(|composer| {
        let posterior = dist(compose(composer, "A", "B", &named("alice", "bob")).unwrap());
        assert_float_absolute_eq!(0.7, posterior.mean(), 1e-12);
        assert_float_absolute_eq!(0.11, posterior.variance(), 1e-12);
    });
}

#[test]
fn named_opponent_with_rating_gap() {
    with_composer(|composer| {
        // alice (1500) playing A against carol (1700) playing B
        let posterior = dist(compose(composer, "A", "B", &named("alice", "carol")).unwrap());
        let shift = rating_to_logit(-200.0, ELO_SCALE_CONSTANT);
        let expected_mean = 0.4 + 0.2 - 0.4 + shift * 0.9;
        let expected_variance = 0.09 + 0.01 + 0.0225 + (shift * 0.1).powi(2);
        assert_float_absolute_eq!(expected_mean, posterior.mean(), 1e-12);
        assert_float_absolute_eq!(expected_variance, posterior.variance(), 1e-12);
    });
}

#[test]
fn mirror_without_player_is_neutral() {
    with_composer(|composer| {
        assert_eq!(Posterior::Neutral, compose(composer, "A", "A", &Scope::Global).unwrap());
        // no recorded mirror games for C, yet the mirror is still even
        assert_eq!(Posterior::Neutral, compose(composer, "C", "C", &Scope::Global).unwrap());
    });
}

#[test]
fn mirror_with_player_excludes_prior() {
    with_composer(|composer| {
        let posterior = dist(compose(composer, "B", "B", &named("alice", "bob")).unwrap());
        assert_float_absolute_eq!(0.1, posterior.mean(), 1e-12);
        assert_float_absolute_eq!(0.05, posterior.variance(), 1e-12);
    });
}

#[test]
fn missing_matchup_is_no_data() {
    with_composer(|composer| {
        assert_eq!(Posterior::NoData, compose(composer, "A", "C", &Scope::Global).unwrap());
        assert_eq!(
            Posterior::NoData,
            compose(
                composer,
                "B",
                "C",
                &population("alice", AgainstSkillPolicy::Own, AgainstRatingPolicy::Own)
            )
            .unwrap()
        );
    });
}

#[test]
fn zero_count_is_no_data() {
    with_composer(|composer| {
        let empty = MatchupStats::new(0.8, 0.2, 0);
        assert_eq!(
            Posterior::NoData,
            composer.compose("A", "B", &Scope::Global, Some(&empty)).unwrap()
        );
    });
}

#[test]
fn unknown_player_fails_even_without_data() {
    with_composer(|composer| {
        assert_eq!(
            Err(EstimateError::not_found(Entity::Player, "mallory")),
            compose(composer, "A", "C", &named("mallory", "bob"))
        );
        assert_eq!(
            Err(EstimateError::not_found(Entity::Player, "mallory")),
            compose(composer, "A", "B", &named("alice", "mallory"))
        );
        assert_eq!(
            Err(EstimateError::not_found(Entity::PlayerCharacter, "bob/A")),
            compose(composer, "A", "B", &named("bob", "alice"))
        );
    });
}

#[test]
fn unknown_character_fails() {
    with_composer(|composer| {
        assert_eq!(
            Err(EstimateError::not_found(Entity::Character, "Z")),
            compose(composer, "A", "Z", &Scope::Global)
        );
    });
}

#[test]
fn own_skill_and_own_rating() {
    with_composer(|composer| {
        let scope = population("alice", AgainstSkillPolicy::Own, AgainstRatingPolicy::Own);
        let posterior = dist(compose(composer, "A", "B", &scope).unwrap());
        // alice averages 0.1 ± 0.15 across A and B
        assert_float_absolute_eq!(0.4 + 0.2 - 0.1, posterior.mean(), 1e-12);
        assert_float_absolute_eq!(0.09 + 0.01 + 0.0225, posterior.variance(), 1e-12);
    });
}

#[test]
fn quantile_skill_and_quantile_rating() {
    with_composer(|composer| {
        let scope = population(
            "alice",
            AgainstSkillPolicy::Quantile(Quantile::P50),
            AgainstRatingPolicy::Quantile(Quantile::P100),
        );
        let posterior = dist(compose(composer, "A", "B", &scope).unwrap());
        let median_b = composer.quantiles.skill("B", Quantile::P50).unwrap();
        // best rating in the population is carol's 1700
        let shift = rating_to_logit(-200.0, ELO_SCALE_CONSTANT);
        assert_float_absolute_eq!(
            0.4 + 0.2 - median_b.mean() + shift * 0.9,
            posterior.mean(),
            1e-12
        );
        assert_float_absolute_eq!(
            0.09 + 0.01 + median_b.variance() + (shift * 0.1).powi(2),
            posterior.variance(),
            1e-12
        );
    });
}

#[test]
fn quantile_skill_from_a_single_player() {
    with_composer(|composer| {
        let scope = population(
            "bob",
            AgainstSkillPolicy::Quantile(Quantile::P50),
            AgainstRatingPolicy::Own,
        );
        // bob is the only C player, so every C quantile is his own skill
        let posterior = dist(compose(composer, "C", "C", &scope).unwrap());
        assert_float_absolute_eq!(0.0, posterior.mean(), 1e-12);
        assert_float_absolute_eq!(0.08, posterior.variance(), 1e-12);
    });
}

#[test]
fn unplayed_character_against_population_is_no_data() {
    let mut snapshot = testing::snapshot();
    snapshot.characters.push("D").unwrap();
    let snapshot = snapshot.with_population_quantiles().unwrap();
    let quantiles = snapshot.quantiles.clone().unwrap();
    let composer = Composer {
        snapshot: &snapshot,
        quantiles: &quantiles,
        elo_scale_constant: ELO_SCALE_CONSTANT,
    };

    let scope = population(
        "alice",
        AgainstSkillPolicy::Quantile(Quantile::P50),
        AgainstRatingPolicy::Own,
    );
    assert_eq!(Posterior::NoData, compose(&composer, "A", "D", &scope).unwrap());

    // the player is still checked first
    let scope = population(
        "mallory",
        AgainstSkillPolicy::Quantile(Quantile::P50),
        AgainstRatingPolicy::Own,
    );
    assert_eq!(
        Err(EstimateError::not_found(Entity::Player, "mallory")),
        compose(&composer, "A", "D", &scope)
    );
}

#[test]
fn policies_parse() {
    assert_eq!(AgainstSkillPolicy::Own, "self".parse().unwrap());
    assert_eq!(AgainstRatingPolicy::Own, "own".parse().unwrap());
    assert_eq!(
        AgainstSkillPolicy::Quantile(Quantile::P95),
        "95%".parse().unwrap()
    );
    assert!(matches!(
        "10%".parse::<AgainstRatingPolicy>(),
        Err(EstimateError::InvalidArgument(_))
    ));
}

#[test]
fn scope_display() {
    assert_eq!("global", Scope::Global.to_string());
    assert_eq!("alice vs bob", named("alice", "bob").to_string());
    let scope = population(
        "alice",
        AgainstSkillPolicy::Own,
        AgainstRatingPolicy::Quantile(Quantile::P25),
    );
    assert_eq!("alice vs Own/Quantile(P25)", scope.to_string());
    assert_eq!(Some("alice"), scope.player());
    assert_eq!(None, scope.opponent());
}
