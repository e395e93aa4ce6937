//! # SEFA
//!
//! SEFAは、意味事象形式（Semantic Event Form, SEF）に基づく英文の意味解析器です。
//!
//! ## 概要
//!
//! 入力文の各語を語彙辞書で引いて統語クラスと意味クラスの候補を求め、
//! `(左クラス, 関係, 右クラス)`の3つ組であるSEFを語位置に束縛します。
//! 語順規則と具体性による絞り込みを経た3つ組から根を選び、修飾の部分構造を
//! 付加して深層構造の木を組み立てます。
//!
//! ## 主な機能
//!
//! - **語彙辞書**: 多義語の語義を保持し、未知語には汎用語義を補います
//! - **カスタム語彙ストア**: rkyv形式で未知語の語義を永続化します
//! - **曖昧性の提示**: 得点が並んだ解釈はすべて返します
//! - **語義選択**: 解釈に整合する語義を語位置ごとに選びます
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use sefa::Analyzer;
//! use sefa::interpretation::format_with_senses;
//!
//! let analyzer = Analyzer::with_defaults()?;
//! let mut worker = analyzer.new_worker();
//!
//! worker.reset_sentence("The angry pitcher struck the careless batter.");
//! worker.analyze();
//! assert_eq!(worker.num_interpretations(), 1);
//!
//! let root = worker.interpretation(0).unwrap();
//! assert_eq!(root.sef().to_string(), "(PERSON HIT PERSON)");
//!
//! let sensed = worker.select_word_senses(0);
//! assert!(format_with_senses(sensed.as_ref()).contains("STRUCK_3"));
//! # Ok(())
//! # }
//! ```

/// 解析器とワーカー
pub mod analyzer;

/// エラー型の定義
pub mod errors;

/// 解析結果の木
pub mod interpretation;

/// 語彙辞書とカスタム語彙ストア
pub mod lexicon;

/// SEFとその絞り込み
pub mod sef;

/// 入力文の内部表現
pub mod sentence;


// Re-exports
pub use analyzer::{Analyzer, Worker};
pub use interpretation::{Interpretation, SensedInterpretation};
pub use lexicon::{Lexicon, WordSense};
pub use sef::{Sef, SefCatalog};

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
