//! 解析結果の深層構造を表すモジュール。
//!
//! [`Interpretation`]は根となる3つ組と、その左右の項の位置に付加された
//! 修飾の部分構造からなる二分木です。子は親が排他的に所有します。
use std::collections::BTreeSet;
use std::fmt;

use crate::sef::{ComplexTriple, Positions, Sef};

/// 解釈が存在しない場合の表示。
pub const NO_INTERPRETATION: &str = "NO INTERPRETATION";

/// 1つの解釈の木。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interpretation {
    triple: ComplexTriple,
    left: Option<Box<Interpretation>>,
    right: Option<Box<Interpretation>>,
}

impl Interpretation {
    pub(crate) fn new(
        triple: ComplexTriple,
        left: Option<Interpretation>,
        right: Option<Interpretation>,
    ) -> Self {
        Self {
            triple,
            left: left.map(Box::new),
            right: right.map(Box::new),
        }
    }

    /// このノードの3つ組を返します。
    #[inline(always)]
    pub const fn triple(&self) -> &ComplexTriple {
        &self.triple
    }

    #[inline(always)]
    pub const fn sef(&self) -> &Sef {
        self.triple.sef()
    }

    #[inline(always)]
    pub const fn positions(&self) -> Positions {
        self.triple.positions()
    }

    #[inline(always)]
    pub const fn words(&self) -> &[String; 3] {
        self.triple.words()
    }

    /// 左の項に付加された部分構造を返します。
    #[inline(always)]
    pub fn left(&self) -> Option<&Interpretation> {
        self.left.as_deref()
    }

    /// 右の項に付加された部分構造を返します。
    #[inline(always)]
    pub fn right(&self) -> Option<&Interpretation> {
        self.right.as_deref()
    }

    /// 木のノードを行きがけ順（自身、左、右）で返します。
    pub fn nodes(&self) -> Vec<&Interpretation> {
        let mut nodes = vec![];
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            nodes.push(node);
            if let Some(right) = node.right() {
                stack.push(right);
            }
            if let Some(left) = node.left() {
                stack.push(left);
            }
        }
        nodes
    }

    /// 木全体が束縛する0でない語位置の集合を返します。
    pub fn covered_positions(&self) -> BTreeSet<usize> {
        self.nodes()
            .into_iter()
            .flat_map(|n| n.positions().filled())
            .collect()
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self.words(), self.left(), self.right())
    }
}

/// 語義番号で注釈された解釈の木。
///
/// 左右の項と明示的な関係の語は`word_n`の形に置き換えられています。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SensedInterpretation {
    triple: ComplexTriple,
    words_with_senses: [String; 3],
    left: Option<Box<SensedInterpretation>>,
    right: Option<Box<SensedInterpretation>>,
}

impl SensedInterpretation {
    pub(crate) fn new(
        triple: ComplexTriple,
        words_with_senses: [String; 3],
        left: Option<SensedInterpretation>,
        right: Option<SensedInterpretation>,
    ) -> Self {
        Self {
            triple,
            words_with_senses,
            left: left.map(Box::new),
            right: right.map(Box::new),
        }
    }

    #[inline(always)]
    pub const fn triple(&self) -> &ComplexTriple {
        &self.triple
    }

    /// 注釈済みの語を左、関係、右の順に返します。
    #[inline(always)]
    pub const fn words_with_senses(&self) -> &[String; 3] {
        &self.words_with_senses
    }

    #[inline(always)]
    pub fn left(&self) -> Option<&SensedInterpretation> {
        self.left.as_deref()
    }

    #[inline(always)]
    pub fn right(&self) -> Option<&SensedInterpretation> {
        self.right.as_deref()
    }
}

impl fmt::Display for SensedInterpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, &self.words_with_senses, self.left(), self.right())
    }
}

fn write_node<T>(
    f: &mut fmt::Formatter<'_>,
    words: &[String; 3],
    left: Option<&T>,
    right: Option<&T>,
) -> fmt::Result
where
    T: fmt::Display,
{
    f.write_str("(")?;
    match left {
        Some(child) => write!(f, "{child}")?,
        None => f.write_str(&words[0].to_uppercase())?,
    }
    write!(f, " {} ", words[1].to_uppercase())?;
    match right {
        Some(child) => write!(f, "{child}")?,
        None => f.write_str(&words[2].to_uppercase())?,
    }
    f.write_str(")")
}

/// 解釈を`(LEFT REL RIGHT)`の形に整形します。
///
/// `None`の場合は[`NO_INTERPRETATION`]を返します。
pub fn format_interpretation(interpretation: Option<&Interpretation>) -> String {
    interpretation.map_or_else(|| NO_INTERPRETATION.to_string(), ToString::to_string)
}

/// 語義注釈付きの解釈を整形します。
///
/// `None`の場合は[`NO_INTERPRETATION`]を返します。
pub fn format_with_senses(interpretation: Option<&SensedInterpretation>) -> String {
    interpretation.map_or_else(|| NO_INTERPRETATION.to_string(), ToString::to_string)
}
