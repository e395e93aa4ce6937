use crate::analyzer::Analyzer;
use crate::sef::{
    ComplexTriple, MODIFIER, create_complex_triples, eliminate_abstract_duplicates,
    filter_by_order,
};
use crate::sentence::Sentence;

const SENTENCES: &str = include_str!("./resources/sentences.txt");

fn sentences() -> impl Iterator<Item = &'static str> {
    SENTENCES
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
}

fn compile(analyzer: &Analyzer, input: &str) -> Sentence {
    let mut sent = Sentence::new();
    sent.set_sentence(input);
    sent.compile(analyzer.lexicon(), false);
    sent
}

fn ordered_triples(analyzer: &Analyzer, sent: &Sentence) -> Vec<ComplexTriple> {
    let relevant = analyzer.catalog().relevant_sefs(sent);
    filter_by_order(create_complex_triples(&relevant, sent))
}

/// すべての語位置が空でないクラス集合を持つことのテスト
#[test]
fn test_every_position_has_classes() {
    let analyzer = Analyzer::with_defaults().unwrap();
    for input in sentences() {
        let sent = compile(&analyzer, input);
        assert!(!sent.is_empty(), "{input}");
        for (pos, word) in sent.positions() {
            assert!(!word.classes().is_empty(), "{input}: {pos}");
            assert!(!word.senses().is_empty(), "{input}: {pos}");
        }
    }
}

/// 同じ入力の解析結果が変わらないことのテスト
#[test]
fn test_idempotence() {
    let analyzer = Analyzer::with_defaults().unwrap();
    let mut worker = analyzer.new_worker();
    for input in sentences() {
        worker.reset_sentence(input);
        worker.analyze();
        let first = worker.interpretations().to_vec();
        let first_triples = worker.final_triples().to_vec();

        worker.reset_sentence(input);
        worker.analyze();
        assert_eq!(worker.interpretations(), first.as_slice(), "{input}");
        assert_eq!(worker.final_triples(), first_triples.as_slice(), "{input}");
    }
}

/// 最終的な3つ組が語順規則を満たすことのテスト
#[test]
fn test_order_rules_hold() {
    let analyzer = Analyzer::with_defaults().unwrap();
    let mut worker = analyzer.new_worker();
    for input in sentences() {
        worker.reset_sentence(input);
        worker.analyze();
        for t in worker.final_triples() {
            let sef = t.sef();
            let p = t.positions();
            if ["V", "HIT", "CONSUME", "BE", "EQUIV", "SIMILAR"].contains(&sef.relation())
                && !p.is_implicit()
            {
                assert!(p.left < p.relation && p.relation < p.right, "{input}: {t}");
            }
            if sef.relation() == "SIMILAR" {
                assert!(!p.is_implicit(), "{input}: {t}");
            }
            if sef.relation() == MODIFIER
                && ["ADJ", "EMOTION", "ATTITUDE", "AGE", "ART"].contains(&sef.right())
            {
                assert!(p.right < p.left, "{input}: {t}");
            }
        }
    }
}

/// 残った3つ組が同じ語位置の3つ組のうち最も具体的であることのテスト
#[test]
fn test_specificity() {
    let analyzer = Analyzer::with_defaults().unwrap();
    for input in sentences() {
        let sent = compile(&analyzer, input);
        let ordered = ordered_triples(&analyzer, &sent);
        let kept = eliminate_abstract_duplicates(ordered.clone());

        assert!(!kept.is_empty() || ordered.is_empty(), "{input}");
        for t in &kept {
            for other in ordered.iter().filter(|o| o.positions() == t.positions()) {
                assert!(t.abstraction_level() <= other.abstraction_level(), "{input}: {t}");
            }
        }
        for t in &ordered {
            assert!(
                kept.iter().any(|k| k.positions() == t.positions()),
                "{input}: {t}"
            );
        }
    }
}

/// 解釈の木が文中の語位置だけを束縛し、根が最終的な3つ組であることのテスト
#[test]
fn test_interpretations_are_well_formed() {
    let analyzer = Analyzer::with_defaults().unwrap();
    let mut worker = analyzer.new_worker();
    for input in sentences() {
        worker.reset_sentence(input);
        worker.analyze();
        assert!(worker.num_interpretations() > 0, "{input}");

        let len = worker.sentence().len();
        for (i, interp) in worker.interpretations().iter().enumerate() {
            assert!(worker.final_triples().contains(interp.triple()), "{input}");
            assert!(
                interp.covered_positions().iter().all(|&p| 1 <= p && p <= len),
                "{input}"
            );
            for node in interp.nodes().into_iter().skip(1) {
                assert!(node.sef().is_modifier(), "{input}: {node}");
            }
            let sensed = worker.select_word_senses(i).unwrap();
            assert!(!sensed.to_string().is_empty());
        }
    }
}
