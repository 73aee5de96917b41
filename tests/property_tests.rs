use proptest::prelude::*;

use customers_rs::models::money::{self, Amount};

proptest! {
    #[test]
    fn pence_round_trips(pence in any::<i64>()) {
        prop_assert_eq!(Amount::from_pence(pence).pence(), pence);
    }

    #[test]
    fn json_round_trips(pence in any::<i64>()) {
        let amount = Amount::from_pence(pence);
        let encoded = serde_json::to_string(&amount).unwrap();
        let decoded: Amount = serde_json::from_str(&encoded).unwrap();
        prop_assert_eq!(decoded, amount);
    }

    #[test]
    fn json_encoding_is_the_bare_integer(pence in any::<i64>()) {
        let encoded = serde_json::to_string(&Amount::from_pence(pence)).unwrap();
        prop_assert_eq!(encoded, pence.to_string());
    }

    // Bounded so float conversion in the rounding path stays exact.
    #[test]
    fn floor_never_exceeds_ceil(pence in -1_000_000_000i64..=1_000_000_000) {
        let amount = Amount::from_pence(pence);
        prop_assert!(amount.floor() <= amount.ceil());
        prop_assert!(amount.floor() <= amount);
        prop_assert!(amount <= amount.ceil());
    }

    #[test]
    fn rounded_amounts_are_whole_pounds(pence in -1_000_000_000i64..=1_000_000_000) {
        let amount = Amount::from_pence(pence);
        for rounded in [amount.ceil(), amount.floor(), amount.round(), amount.trunc()] {
            prop_assert_eq!(rounded.pence() % 100, 0);
        }
    }

    #[test]
    fn display_is_well_formed(pence in any::<i64>()) {
        let formatted = Amount::from_pence(pence).to_string();
        let pattern = regex::Regex::new(r"^-?£\d{1,3}(,\d{3})*\.\d{2}$").unwrap();
        prop_assert!(pattern.is_match(&formatted), "got {}", formatted);
    }

    #[test]
    fn max_and_min_agree_with_ordering(a in any::<i64>(), b in any::<i64>()) {
        let (a, b) = (Amount::from_pence(a), Amount::from_pence(b));
        prop_assert_eq!(money::max(a, b), if a > b { a } else { b });
        prop_assert_eq!(money::min(a, b), if a < b { a } else { b });
        prop_assert!(money::min(a, b) <= money::max(a, b));
    }
}
