//! 解釈に基づく語義の選択。
use hashbrown::HashMap;

use crate::interpretation::{Interpretation, SensedInterpretation};
use crate::lexicon::WordSense;
use crate::sef::{ComplexTriple, Positions, Sef};
use crate::sentence::Sentence;

/// 語義が3つ組の中で位置`pos`の役割に合うか判定します。
///
/// 左、右、明示的な関係の順に調べ、最初に該当した役割のタグだけを比較します。
fn fits(sense: &WordSense, pos: usize, sef: &Sef, p: Positions) -> bool {
    if pos == p.left {
        sense.matches_class(sef.left())
    } else if pos == p.right {
        sense.matches_class(sef.right())
    } else if pos == p.relation {
        sense.matches_class(sef.relation())
    } else {
        false
    }
}

/// 解釈の木に現れるSEFとの整合性が最も高い語義を語位置ごとに選び、
/// 語義番号で注釈した木を返します。
///
/// 語義の得点は、その語位置を束縛するノードのうち役割が語義のクラスに合うものの数です。
/// 同点の場合は先に登録された語義が選ばれます。
///
/// # 引数
///
/// * `interpretation` - 注釈する解釈
/// * `sent` - 解釈の元になった文
///
/// # 戻り値
///
/// 左右の項と明示的な関係の語を`word_n`に置き換えた木
pub fn select_word_senses(interpretation: &Interpretation, sent: &Sentence) -> SensedInterpretation {
    let nodes: Vec<(&Sef, Positions)> = interpretation
        .nodes()
        .into_iter()
        .map(|n| (n.sef(), n.positions()))
        .collect();

    let mut chosen: HashMap<usize, &WordSense> = HashMap::new();
    for (pos, word) in sent.positions() {
        let mut best: Option<(&WordSense, usize)> = None;
        for sense in word.senses() {
            let score = nodes
                .iter()
                .filter(|&&(sef, p)| fits(sense, pos, sef, p))
                .count();
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((sense, score));
            }
        }
        if let Some((sense, _)) = best {
            chosen.insert(pos, sense);
        }
    }

    annotate(interpretation, &chosen)
}

fn annotate(node: &Interpretation, chosen: &HashMap<usize, &WordSense>) -> SensedInterpretation {
    let triple: &ComplexTriple = node.triple();
    let p = triple.positions();
    let mut words = triple.words().clone();

    let label = |pos: usize| chosen.get(&pos).map(|s| s.label());
    if let Some(l) = label(p.left) {
        words[0] = l;
    }
    if !p.is_implicit()
        && let Some(l) = label(p.relation)
    {
        words[1] = l;
    }
    if let Some(l) = label(p.right) {
        words[2] = l;
    }

    SensedInterpretation::new(
        triple.clone(),
        words,
        node.left().map(|c| annotate(c, chosen)),
        node.right().map(|c| annotate(c, chosen)),
    )
}
