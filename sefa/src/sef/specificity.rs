use hashbrown::HashMap;

use crate::sef::{ComplexTriple, Positions};

/// 同じ語位置を束縛する3つ組のうち、より抽象的なものを除外します。
///
/// 語位置ごとに抽象度の最小値を求め、それに等しい3つ組をすべて残します。
/// 入力順は保たれます。
pub fn eliminate_abstract_duplicates(triples: Vec<ComplexTriple>) -> Vec<ComplexTriple> {
    let mut min_levels: HashMap<Positions, u32> = HashMap::new();
    for t in &triples {
        let level = t.abstraction_level();
        min_levels
            .entry(t.positions())
            .and_modify(|m| *m = (*m).min(level))
            .or_insert(level);
    }

    triples
        .into_iter()
        .filter(|t| min_levels.get(&t.positions()) == Some(&t.abstraction_level()))
        .collect()
}
