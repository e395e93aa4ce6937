//! 根の選択と深層構造の組み立て。
use hashbrown::HashSet;

use crate::interpretation::Interpretation;
use crate::lexicon::WordSense;
use crate::sef::{ComplexTriple, MODIFIER};
use crate::sentence::Sentence;

/// 文の根になり得る動詞的な関係。
pub const VERB_LIKE_RELATIONS: [&str; 10] = [
    "V", "HIT", "CONSUME", "MOVE", "BE", "EQUIV", "DISCOVER", "BOYCOTT", "SIMILAR", "RESEMBLE",
];

const RELATION_WEIGHT: u32 = 3;
const ARGUMENT_WEIGHT: u32 = 2;

/// 意味クラス列の先頭に現れるタグへの加点。
#[inline(always)]
const fn specificity_bonus(rank: usize) -> u32 {
    if rank == 0 { 1 } else { 0 }
}

fn relation_score(senses: &[WordSense], tag: &str) -> u32 {
    senses
        .iter()
        .find_map(|s| s.semantic_rank(tag))
        .map_or(0, |rank| RELATION_WEIGHT + specificity_bonus(rank))
}

fn argument_score(senses: &[WordSense], tag: &str) -> u32 {
    senses
        .iter()
        .find(|s| s.matches_class(tag))
        .map_or(0, |s| {
            ARGUMENT_WEIGHT + s.semantic_rank(tag).map_or(0, specificity_bonus)
        })
}

/// 根の候補の得点を計算します。
pub fn root_score(triple: &ComplexTriple, sent: &Sentence) -> u32 {
    let p = triple.positions();
    let sef = triple.sef();
    let senses = |pos| sent.position(pos).map_or(&[][..], |w| w.senses());

    let mut score = 0;
    if !p.is_implicit() {
        score += relation_score(senses(p.relation), sef.relation());
    }
    score += argument_score(senses(p.left), sef.left());
    score += argument_score(senses(p.right), sef.right());
    score
}

/// 最終的な3つ組から解釈の根を選び、そのインデックスを順に返します。
///
/// 1. 動詞的な関係を持つ3つ組を候補とし、[`root_score`]が最大のものを集めます。
/// 2. それらのうち抽象度が最小のものを残します。
///
/// 最大得点が0の場合は候補をすべて返し、候補がない場合は先頭の3つ組を返します。
/// 3つ組が1つもなければ空です。
pub fn select_roots(triples: &[ComplexTriple], sent: &Sentence) -> Vec<usize> {
    if triples.is_empty() {
        return vec![];
    }

    let scored: Vec<(usize, u32)> = triples
        .iter()
        .enumerate()
        .filter(|(_, t)| VERB_LIKE_RELATIONS.contains(&t.sef().relation()))
        .map(|(i, t)| (i, root_score(t, sent)))
        .collect();

    let Some(max_score) = scored.iter().map(|&(_, s)| s).max() else {
        return vec![0];
    };
    if max_score == 0 {
        return scored.into_iter().map(|(i, _)| i).collect();
    }

    let best: Vec<usize> = scored
        .into_iter()
        .filter(|&(_, s)| s == max_score)
        .map(|(i, _)| i)
        .collect();
    let min_level = best
        .iter()
        .map(|&i| triples[i].abstraction_level())
        .min()
        .unwrap_or_default();
    best.into_iter()
        .filter(|&i| triples[i].abstraction_level() == min_level)
        .collect()
}

/// 根から修飾の部分構造を再帰的に付加し、解釈の木を組み立てます。
///
/// 左右の項の位置それぞれについて、その位置を左に持ち、残りの位置が
/// まだ使われていない`MOD`の3つ組のうち抽象度が最小のもの（同点なら先のもの）を
/// 子として付加します。左右の探索は互いに独立です。
pub fn assemble(root: usize, triples: &[ComplexTriple]) -> Interpretation {
    let seen: HashSet<usize> = triples[root].positions().filled().collect();
    assemble_node(root, triples, seen)
}

fn assemble_node(idx: usize, triples: &[ComplexTriple], seen: HashSet<usize>) -> Interpretation {
    let node = &triples[idx];
    let p = node.positions();

    let child = |anchor: usize| {
        let chosen = find_modifier(idx, anchor, triples, &seen)?;
        let mut child_seen = seen.clone();
        child_seen.extend(triples[chosen].positions().filled());
        Some(assemble_node(chosen, triples, child_seen))
    };
    let left = child(p.left);
    let right = child(p.right);

    Interpretation::new(node.clone(), left, right)
}

fn find_modifier(
    current: usize,
    anchor: usize,
    triples: &[ComplexTriple],
    seen: &HashSet<usize>,
) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (i, t) in triples.iter().enumerate() {
        let p = t.positions();
        if i == current
            || t.sef().relation() != MODIFIER
            || p.left != anchor
            || p.filled().any(|q| q != anchor && seen.contains(&q))
        {
            continue;
        }
        let level = t.abstraction_level();
        if best.is_none_or(|(_, l)| level < l) {
            best = Some((i, level));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::lexicon::Lexicon;
    use crate::sef::{Positions, Sef};

    fn compile(input: &str) -> Sentence {
        let lexicon = Lexicon::with_seed_vocabulary().unwrap();
        let mut sent = Sentence::new();
        sent.set_sentence(input);
        sent.compile(&lexicon, false);
        sent
    }

    fn triple(sef: Sef, left: usize, relation: usize, right: usize) -> ComplexTriple {
        ComplexTriple::new(
            sef,
            Positions::new(left, relation, right),
            ["l", "r", "r"].map(String::from),
        )
    }

    #[test]
    fn test_root_score() {
        let sent = compile("the angry pitcher struck the careless batter");
        let hit = triple(Sef::new("PERSON", "HIT", "PERSON"), 3, 4, 7);
        // HIT is the first semantic class of struck_3; PERSON is first for both.
        assert_eq!(root_score(&hit, &sent), 4 + 3 + 3);

        let generic = triple(Sef::new("N", "V", "N"), 3, 4, 7);
        assert_eq!(root_score(&generic, &sent), 2 + 2);
    }

    #[test]
    fn test_select_roots() {
        let sent = compile("the angry pitcher struck the careless batter");
        let triples = vec![
            triple(Sef::new("PERSON", "MOD", "EMOTION"), 3, 0, 2),
            triple(Sef::new("PERSON", "HIT", "PERSON"), 3, 4, 7),
            triple(Sef::new("PERSON", "DISCOVER", "OBJECT"), 7, 4, 3),
        ];
        assert_eq!(select_roots(&triples, &sent), vec![1]);
    }

    #[test]
    fn test_select_roots_fallbacks() {
        let sent = compile("the angry pitcher");
        assert!(select_roots(&[], &sent).is_empty());

        let no_verbs = vec![
            triple(Sef::new("PERSON", "MOD", "EMOTION"), 3, 0, 2),
            triple(Sef::new("N", "MOD", "ART"), 3, 0, 1),
        ];
        assert_eq!(select_roots(&no_verbs, &sent), vec![0]);

        let unscored = vec![
            triple(Sef::new("BIRD", "EQUIV", "BIRD"), 1, 0, 2),
            triple(Sef::new("N", "MOD", "ART"), 3, 0, 1),
            triple(Sef::new("N", "V", "N"), 1, 0, 2),
        ];
        assert_eq!(select_roots(&unscored, &sent), vec![0, 2]);
    }

    #[test]
    fn test_assemble() {
        let triples = vec![
            triple(Sef::new("PERSON", "CONSUME", "FOOD"), 2, 3, 4),
            triple(Sef::new("N", "MOD", "ADJ"), 2, 0, 1),
            triple(Sef::new("PERSON", "MOD", "AGE"), 2, 0, 1),
            triple(Sef::new("N", "MOD", "N"), 4, 0, 3),
        ];
        let interp = assemble(0, &triples);

        let left = interp.left().unwrap();
        assert_eq!(left.sef(), &Sef::new("PERSON", "MOD", "AGE"));
        assert!(left.left().is_none());
        // position 3 is already used by the root
        assert!(interp.right().is_none());
    }

    #[test]
    fn test_assemble_seen_is_per_branch() {
        let triples = vec![
            triple(Sef::new("PERSON", "HIT", "PERSON"), 3, 4, 7),
            triple(Sef::new("PERSON", "MOD", "EMOTION"), 3, 0, 2),
            triple(Sef::new("PERSON", "MOD", "EMOTION"), 7, 0, 2),
        ];
        let interp = assemble(0, &triples);

        assert_eq!(interp.left().unwrap().positions(), Positions::new(3, 0, 2));
        assert_eq!(interp.right().unwrap().positions(), Positions::new(7, 0, 2));
    }
}
