use crate::sef::{ComplexTriple, Positions, Sef};

const MODIFIED_BEFORE: [&str; 5] = ["ADJ", "EMOTION", "ATTITUDE", "AGE", "ART"];
const SUBJECT_VERB_OBJECT: [&str; 5] = ["V", "HIT", "CONSUME", "BE", "EQUIV"];
const MOVING_SUBJECTS: [&str; 4] = ["N", "PERSON", "ANIMAL", "OBJECT"];
const LEFT_FIRST: [&str; 3] = ["PREP", "LOC", "PART"];

/// 関係ごとの語順規則。
///
/// 1つの3つ組に適用される規則は高々1つです。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderRule {
    /// 修飾語が被修飾語より前にある（`right < left`）。
    ModifierPrecedes,

    /// 名詞同士が隣接している（`|left - right| == 1`）。
    Adjacent,

    /// 主語、動詞、目的語の順。暗黙の関係では`left < right`。
    SubjectVerbObject,

    /// 関係語が左右の間にある（`left < relation < right`）。
    StrictlyBetween,

    /// 左が右より前にある（`left < right`）。
    LeftPrecedesRight,
}

impl OrderRule {
    /// SEFに適用される規則を返します。規則がなければ`None`です。
    pub fn for_sef(sef: &Sef) -> Option<Self> {
        let relation = sef.relation();
        if sef.is_modifier() {
            if MODIFIED_BEFORE.contains(&sef.right()) {
                return Some(Self::ModifierPrecedes);
            }
            if sef.left() == "N" && sef.right() == "N" {
                return Some(Self::Adjacent);
            }
            return None;
        }
        if SUBJECT_VERB_OBJECT.contains(&relation)
            || (relation == "MOVE" && MOVING_SUBJECTS.contains(&sef.left()))
        {
            return Some(Self::SubjectVerbObject);
        }
        if relation == "SIMILAR" {
            return Some(Self::StrictlyBetween);
        }
        if LEFT_FIRST.contains(&relation) {
            return Some(Self::LeftPrecedesRight);
        }
        None
    }

    /// 語位置が規則を満たすか判定します。
    pub fn accepts(self, p: Positions) -> bool {
        match self {
            Self::ModifierPrecedes => p.right < p.left,
            Self::Adjacent => p.left.abs_diff(p.right) == 1,
            Self::SubjectVerbObject => {
                if p.is_implicit() {
                    p.left < p.right
                } else {
                    p.left < p.relation && p.relation < p.right
                }
            }
            Self::StrictlyBetween => {
                !p.is_implicit() && p.left < p.relation && p.relation < p.right
            }
            Self::LeftPrecedesRight => p.left < p.right,
        }
    }
}

/// 語順規則に反する3つ組を除外します。
///
/// 規則を持たない3つ組はそのまま残ります。入力順は保たれます。
pub fn filter_by_order(triples: Vec<ComplexTriple>) -> Vec<ComplexTriple> {
    triples
        .into_iter()
        .filter(|t| OrderRule::for_sef(t.sef()).is_none_or(|rule| rule.accepts(t.positions())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(sef: Sef, left: usize, relation: usize, right: usize) -> ComplexTriple {
        ComplexTriple::new(
            sef,
            Positions::new(left, relation, right),
            ["l", "r", "r"].map(String::from),
        )
    }

    #[test]
    fn test_for_sef() {
        let cases = [
            (Sef::new("PERSON", "MOD", "EMOTION"), Some(OrderRule::ModifierPrecedes)),
            (Sef::new("N", "MOD", "ART"), Some(OrderRule::ModifierPrecedes)),
            (Sef::new("N", "MOD", "N"), Some(OrderRule::Adjacent)),
            (Sef::new("OBJECT", "MOD", "QUALITY"), None),
            (Sef::new("PERSON", "HIT", "PERSON"), Some(OrderRule::SubjectVerbObject)),
            (Sef::new("DURATION", "MOVE", "WEAPON"), None),
            (Sef::new("ANIMAL", "MOVE", "PLACE"), Some(OrderRule::SubjectVerbObject)),
            (Sef::new("INSECT", "SIMILAR", "WEAPON"), Some(OrderRule::StrictlyBetween)),
            (Sef::new("BIRD", "LOC", "PLACE"), Some(OrderRule::LeftPrecedesRight)),
            (Sef::new("PERSON", "DISCOVER", "OBJECT"), None),
        ];
        for (sef, expected) in cases {
            assert_eq!(OrderRule::for_sef(&sef), expected, "{sef}");
        }
    }

    #[test]
    fn test_accepts() {
        use OrderRule::*;

        assert!(ModifierPrecedes.accepts(Positions::new(3, 0, 2)));
        assert!(!ModifierPrecedes.accepts(Positions::new(2, 0, 3)));
        assert!(Adjacent.accepts(Positions::new(2, 0, 1)));
        assert!(Adjacent.accepts(Positions::new(1, 0, 2)));
        assert!(!Adjacent.accepts(Positions::new(1, 0, 3)));
        assert!(SubjectVerbObject.accepts(Positions::new(2, 0, 4)));
        assert!(SubjectVerbObject.accepts(Positions::new(3, 4, 7)));
        assert!(!SubjectVerbObject.accepts(Positions::new(7, 4, 3)));
        assert!(!SubjectVerbObject.accepts(Positions::new(1, 4, 3)));
        assert!(StrictlyBetween.accepts(Positions::new(2, 3, 4)));
        assert!(!StrictlyBetween.accepts(Positions::new(2, 0, 4)));
        assert!(LeftPrecedesRight.accepts(Positions::new(1, 0, 4)));
        assert!(!LeftPrecedesRight.accepts(Positions::new(4, 2, 1)));
    }

    #[test]
    fn test_filter_by_order() {
        let triples = vec![
            triple(Sef::new("PERSON", "HIT", "PERSON"), 3, 4, 7),
            triple(Sef::new("PERSON", "HIT", "PERSON"), 7, 4, 3),
            triple(Sef::new("PERSON", "MOD", "EMOTION"), 3, 0, 2),
            triple(Sef::new("PERSON", "MOD", "EMOTION"), 2, 0, 3),
            triple(Sef::new("PERSON", "DISCOVER", "OBJECT"), 7, 4, 3),
        ];
        let kept = filter_by_order(triples);

        let positions: Vec<_> = kept.iter().map(|t| t.positions()).collect();
        assert_eq!(
            positions,
            vec![
                Positions::new(3, 4, 7),
                Positions::new(3, 0, 2),
                Positions::new(7, 4, 3),
            ]
        );
    }
}
