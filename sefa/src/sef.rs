//! 意味事象形式（Semantic Event Form, SEF）のモジュール。
//!
//! SEFは`(左クラス, 関係, 右クラス)`の3つ組で、意味のあるクラスの組み合わせを表します。
//! このモジュールはSEFの集合（[`SefCatalog`]）と、文に対してSEFを絞り込む
//! 4段階の純粋な変換を提供します。
//!
//! 1. [`SefCatalog::relevant_sefs`]: 文に現れるクラスに関係するSEFの選択
//! 2. [`create_complex_triples`]: SEFを語位置に束縛した候補の生成
//! 3. [`filter_by_order`]: 関係ごとの語順規則による除外
//! 4. [`eliminate_abstract_duplicates`]: 同じ語位置の候補のうち抽象的なものの除外
mod catalog;
mod order;
mod specificity;
mod triple;

use std::fmt;

pub use crate::sef::catalog::SefCatalog;
pub use crate::sef::order::{OrderRule, filter_by_order};
pub use crate::sef::specificity::eliminate_abstract_duplicates;
pub use crate::sef::triple::{ComplexTriple, Positions, create_complex_triples};

/// 暗黙の修飾関係を表す関係タグ。
pub const MODIFIER: &str = "MOD";

/// 品詞そのものを表す統語クラス。
///
/// 抽象度の計算でこれらのタグは意味クラスより抽象的とみなされます。
pub const SYNTACTIC_CLASSES: [&str; 6] = ["N", "V", "ADJ", "ADV", "ART", "PREP"];

const ABSTRACTION_PENALTY: u32 = 10;

/// 意味事象形式の3つ組。
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Sef {
    left: String,
    relation: String,
    right: String,
}

impl Sef {
    /// 新しいSEFを作成します。
    pub fn new<L, R, T>(left: L, relation: R, right: T) -> Self
    where
        L: Into<String>,
        R: Into<String>,
        T: Into<String>,
    {
        Self {
            left: left.into(),
            relation: relation.into(),
            right: right.into(),
        }
    }

    #[inline(always)]
    pub fn left(&self) -> &str {
        &self.left
    }

    #[inline(always)]
    pub fn relation(&self) -> &str {
        &self.relation
    }

    #[inline(always)]
    pub fn right(&self) -> &str {
        &self.right
    }

    /// 関係が暗黙の修飾（`MOD`）か判定します。
    #[inline(always)]
    pub fn is_modifier(&self) -> bool {
        self.relation == MODIFIER
    }

    /// 抽象度を返します。
    ///
    /// 3つのタグのうち統語クラスであるものの数に10を掛けた値です。
    /// 小さいほど具体的（意味的）です。
    pub fn abstraction_level(&self) -> u32 {
        [&self.left, &self.relation, &self.right]
            .into_iter()
            .filter(|tag| SYNTACTIC_CLASSES.contains(&tag.as_str()))
            .map(|_| ABSTRACTION_PENALTY)
            .sum()
    }
}

impl fmt::Display for Sef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.left, self.relation, self.right)
    }
}
