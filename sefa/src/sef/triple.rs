use std::fmt;

use crate::sef::{MODIFIER, Sef};
use crate::sentence::Sentence;

/// 複合3つ組が束縛する語位置。
///
/// 位置は1始まりで、`relation == 0`は関係が明示的な語で実現されていない
/// （暗黙の）ことを表します。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Positions {
    pub left: usize,
    pub relation: usize,
    pub right: usize,
}

impl Positions {
    #[inline(always)]
    pub const fn new(left: usize, relation: usize, right: usize) -> Self {
        Self {
            left,
            relation,
            right,
        }
    }

    /// 関係が暗黙か判定します。
    #[inline(always)]
    pub const fn is_implicit(self) -> bool {
        self.relation == 0
    }

    /// 0でない語位置を左、関係、右の順に返します。
    pub fn filled(self) -> impl Iterator<Item = usize> {
        [self.left, self.relation, self.right]
            .into_iter()
            .filter(|&p| p != 0)
    }

    /// `pos`が束縛された語位置のいずれかであるか判定します。
    pub fn contains(self, pos: usize) -> bool {
        pos != 0 && (self.left == pos || self.relation == pos || self.right == pos)
    }
}

impl fmt::Display for Positions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.left, self.relation, self.right)
    }
}

/// 文中の語位置に束縛されたSEF。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComplexTriple {
    sef: Sef,
    positions: Positions,
    words: [String; 3],
}

impl ComplexTriple {
    /// 新しい複合3つ組を作成します。
    ///
    /// `words`は左、関係、右の順の表層形です。
    pub fn new(sef: Sef, positions: Positions, words: [String; 3]) -> Self {
        Self {
            sef,
            positions,
            words,
        }
    }

    #[inline(always)]
    pub const fn sef(&self) -> &Sef {
        &self.sef
    }

    #[inline(always)]
    pub const fn positions(&self) -> Positions {
        self.positions
    }

    #[inline(always)]
    pub const fn words(&self) -> &[String; 3] {
        &self.words
    }

    #[inline(always)]
    pub fn left_word(&self) -> &str {
        &self.words[0]
    }

    /// 関係の語を返します。
    ///
    /// 関係が暗黙の場合は関係タグそのもの（`MOD`など）です。
    #[inline(always)]
    pub fn relation_word(&self) -> &str {
        &self.words[1]
    }

    #[inline(always)]
    pub fn right_word(&self) -> &str {
        &self.words[2]
    }

    /// SEFの抽象度を返します。
    #[inline(always)]
    pub fn abstraction_level(&self) -> u32 {
        self.sef.abstraction_level()
    }
}

impl fmt::Display for ComplexTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} -> ({}, {}, {})",
            self.sef, self.positions, self.words[0], self.words[1], self.words[2]
        )
    }
}

/// SEFを文中の語位置に束縛した候補をすべて生成します。
///
/// 各SEFについて、左クラスを持つ語位置と右クラスを持つ語位置の直積から
/// 同じ位置同士の組を除いたものを生成します。`MOD`は常に暗黙の関係です。
/// それ以外の関係は、左右の位置の間に（どちら向きでも）厳密に挟まれた
/// 最初の関係語を採用し、見つからなければ関係タグを語として暗黙にします。
/// 関係語とは、クラス集合に関係タグを含むか、表層形が関係タグと
/// 大文字小文字を無視して一致する語です。
///
/// 候補は入力のSEF順、左位置順、右位置順に並びます。
pub fn create_complex_triples(sefs: &[&Sef], sent: &Sentence) -> Vec<ComplexTriple> {
    let mut triples = vec![];

    for &sef in sefs {
        let relation_lower = sef.relation().to_lowercase();
        let mut lefts = vec![];
        let mut rights = vec![];
        let mut relations = vec![];
        for (pos, word) in sent.positions() {
            if word.has_class(sef.left()) {
                lefts.push((pos, word.word()));
            }
            if word.has_class(sef.right()) {
                rights.push((pos, word.word()));
            }
            if word.has_class(sef.relation()) || word.word().to_lowercase() == relation_lower {
                relations.push((pos, word.word()));
            }
        }

        for &(left, left_word) in &lefts {
            for &(right, right_word) in &rights {
                if left == right {
                    continue;
                }
                let (relation, relation_word) = if sef.is_modifier() {
                    (0, MODIFIER)
                } else {
                    relations
                        .iter()
                        .copied()
                        .find(|&(r, _)| (left < r && r < right) || (right < r && r < left))
                        .unwrap_or((0, sef.relation()))
                };
                triples.push(ComplexTriple::new(
                    sef.clone(),
                    Positions::new(left, relation, right),
                    [
                        left_word.to_string(),
                        relation_word.to_string(),
                        right_word.to_string(),
                    ],
                ));
            }
        }
    }

    triples
}
