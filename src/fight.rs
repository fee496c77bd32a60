use crate::errors::{PokedexError, PokedexResult};
use crate::pokedex::PokedexTree;
use crate::pokemon::PokemonRecord;
use ordered_float::OrderedFloat;
use std::cmp::Ordering;

const ATTACK_WEIGHT: f64 = 1.5;
const HIT_POINTS_WEIGHT: f64 = 1.2;

/// Fight strength of a single creature: `attack * 1.5 + hit_points * 1.2`.
pub fn fight_score(record: &PokemonRecord) -> OrderedFloat<f64> {
    OrderedFloat(
        f64::from(record.attack) * ATTACK_WEIGHT + f64::from(record.hit_points) * HIT_POINTS_WEIGHT,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FightOutcome {
    FirstWins,
    SecondWins,
    Draw,
}

/// Scores of both fighters and who came out ahead. Nothing is mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct FightReport {
    pub first: PokemonRecord,
    pub second: PokemonRecord,
    pub first_score: OrderedFloat<f64>,
    pub second_score: OrderedFloat<f64>,
    pub outcome: FightOutcome,
}

impl FightReport {
    pub fn between(first: &PokemonRecord, second: &PokemonRecord) -> Self {
        let first_score = fight_score(first);
        let second_score = fight_score(second);
        let outcome = match first_score.cmp(&second_score) {
            Ordering::Greater => FightOutcome::FirstWins,
            Ordering::Less => FightOutcome::SecondWins,
            Ordering::Equal => FightOutcome::Draw,
        };
        FightReport {
            first: first.clone(),
            second: second.clone(),
            first_score,
            second_score,
            outcome,
        }
    }

    pub fn winner(&self) -> Option<&PokemonRecord> {
        match self.outcome {
            FightOutcome::FirstWins => Some(&self.first),
            FightOutcome::SecondWins => Some(&self.second),
            FightOutcome::Draw => None,
        }
    }
}

/// Look both creatures up in the same pokedex and score them.
pub fn fight(tree: &PokedexTree, first: u16, second: u16) -> PokedexResult<FightReport> {
    if tree.is_empty() {
        return Err(PokedexError::Empty);
    }
    let a = tree.search(first).ok_or(PokedexError::NotFound(first))?;
    let b = tree.search(second).ok_or(PokedexError::NotFound(second))?;
    Ok(FightReport::between(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::PokemonType;

    fn fighter(id: u16, attack: u16, hit_points: u16) -> PokemonRecord {
        PokemonRecord::new(id, format!("F{}", id), PokemonType::Fighting, hit_points, attack, false)
    }

    #[test]
    fn test_score_formula() {
        assert_eq!(fight_score(&fighter(1, 50, 50)), OrderedFloat(135.0));
        assert_eq!(fight_score(&fighter(2, 49, 50)), OrderedFloat(133.5));
    }

    #[rstest]
    #[case("higher attack wins", (50, 50), (49, 50), FightOutcome::FirstWins)]
    #[case("second fighter ahead", (10, 10), (10, 11), FightOutcome::SecondWins)]
    #[case("identical stats draw", (40, 60), (40, 60), FightOutcome::Draw)]
    #[case("different stats, same score", (4, 0), (0, 5), FightOutcome::Draw)]
    fn test_fight_outcomes(
        #[case] desc: &str,
        #[case] a: (u16, u16),
        #[case] b: (u16, u16),
        #[case] expected: FightOutcome,
    ) {
        let report = FightReport::between(&fighter(1, a.0, a.1), &fighter(2, b.0, b.1));
        assert_eq!(report.outcome, expected, "{}", desc);
    }

    #[test]
    fn test_fight_looks_up_both_ids() {
        let mut tree = PokedexTree::new();
        tree.insert(fighter(1, 50, 50)).unwrap();
        tree.insert(fighter(2, 49, 50)).unwrap();

        let report = fight(&tree, 1, 2).unwrap();
        assert_eq!(report.winner().map(|r| r.id), Some(1));
        assert_eq!(fight(&tree, 1, 9), Err(PokedexError::NotFound(9)));
        assert_eq!(fight(&PokedexTree::new(), 1, 2), Err(PokedexError::Empty));
    }

    #[test]
    fn test_fighting_itself_is_a_draw() {
        let tree = PokedexTree::with_root(fighter(7, 30, 30)).unwrap();
        assert_eq!(fight(&tree, 7, 7).unwrap().outcome, FightOutcome::Draw);
    }
}
