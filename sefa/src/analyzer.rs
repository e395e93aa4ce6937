//! SEFに基づく意味解析器。
//!
//! # 主要な構造体
//!
//! - [`Analyzer`]: 語彙辞書とSEF集合を保持し、解析の設定を持つ構造体
//! - [`Worker`]: 実際の解析処理を行い、結果を保持するワーカー
//!
//! # 例
//!
//! ```
//! use sefa::Analyzer;
//!
//! let analyzer = Analyzer::with_defaults()?;
//! let mut worker = analyzer.new_worker();
//!
//! worker.reset_sentence("the angry pitcher struck the careless batter");
//! worker.analyze();
//!
//! for interp in worker.interpretations() {
//!     println!("{interp}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod senses;
pub mod structure;
pub mod worker;

use std::sync::Arc;

use crate::errors::Result;
use crate::interpretation::Interpretation;
use crate::lexicon::Lexicon;
use crate::sef::{
    ComplexTriple, SefCatalog, create_complex_triples, eliminate_abstract_duplicates,
    filter_by_order,
};
use crate::sentence::Sentence;

pub use crate::analyzer::worker::Worker;

/// 意味解析器。
///
/// 語彙辞書とSEF集合を`Arc`で共有するため、クローンは安価です。
/// スレッドごとに[`Worker`]を生成して並列に解析できます。
///
/// # フィールド
///
/// - `lexicon`: 語彙辞書。未知語の汎用語義はここに追加されます
/// - `catalog`: SEFの集合
/// - `persist_unknown`: 未知語の汎用語義をカスタム語彙ストアに永続化するかどうか
/// - `max_tokens`: 解析する最大トークン数
#[derive(Clone, Debug)]
pub struct Analyzer {
    lexicon: Arc<Lexicon>,
    catalog: Arc<SefCatalog>,
    persist_unknown: bool,
    max_tokens: Option<usize>,
}

impl Analyzer {
    /// 新しい解析器を作成します。
    ///
    /// # 引数
    ///
    /// * `lexicon` - 語彙辞書
    /// * `catalog` - SEFの集合
    pub fn new(lexicon: Lexicon, catalog: SefCatalog) -> Self {
        Self::from_shared(Arc::new(lexicon), Arc::new(catalog))
    }

    /// 共有された語彙辞書とSEF集合から解析器を作成します。
    ///
    /// 複数の解析器で同じ語彙辞書を共有する場合に使用します。
    /// 未知語に追加された汎用語義はすべての解析器から見えます。
    pub fn from_shared(lexicon: Arc<Lexicon>, catalog: Arc<SefCatalog>) -> Self {
        Self {
            lexicon,
            catalog,
            persist_unknown: false,
            max_tokens: None,
        }
    }

    /// 組み込みの語彙と組み込みのSEF集合で解析器を作成します。
    ///
    /// # エラー
    ///
    /// 組み込みリソースの解析に失敗した場合に[`SefaError`](crate::errors::SefaError)を返します。
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(
            Lexicon::with_seed_vocabulary()?,
            SefCatalog::with_default_forms()?,
        ))
    }

    /// 未知語の汎用語義をカスタム語彙ストアに永続化するかどうかを設定します。
    ///
    /// デフォルトは`false`です。永続化先は[`Lexicon::store_path`]です。
    pub const fn persist_unknown_words(mut self, yes: bool) -> Self {
        self.persist_unknown = yes;
        self
    }

    /// 解析する最大トークン数を指定します。
    ///
    /// 超過したトークンは警告とともに捨てられます。
    ///
    /// # 引数
    ///
    /// * `max_tokens` - 最大トークン数。0は無制限を示し、これがデフォルトです。
    pub const fn max_tokens(mut self, max_tokens: usize) -> Self {
        if max_tokens != 0 {
            self.max_tokens = Some(max_tokens);
        } else {
            self.max_tokens = None;
        }
        self
    }

    #[inline(always)]
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    #[inline(always)]
    pub fn catalog(&self) -> &SefCatalog {
        &self.catalog
    }

    #[inline(always)]
    pub(crate) const fn persist_unknown(&self) -> bool {
        self.persist_unknown
    }

    #[inline(always)]
    pub(crate) const fn max_tokens_limit(&self) -> Option<usize> {
        self.max_tokens
    }

    /// 新しいワーカーを作成します。
    pub fn new_worker(&self) -> Worker {
        Worker::new(self.clone())
    }

    /// 入力文字列を解析し、解釈を順に返します。
    ///
    /// 解釈が1つもない場合は空のベクタを返します。
    pub fn analyze<S>(&self, input: S) -> Vec<Interpretation>
    where
        S: AsRef<str>,
    {
        let mut worker = self.new_worker();
        worker.reset_sentence(input);
        worker.analyze();
        worker.into_interpretations()
    }

    /// トークン化済みの入力を解析し、解釈を順に返します。
    pub fn analyze_tokens<I, S>(&self, tokens: I) -> Vec<Interpretation>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut worker = self.new_worker();
        worker.reset_tokens(tokens);
        worker.analyze();
        worker.into_interpretations()
    }

    /// 4段階の変換を順に適用し、最終的な3つ組を求めます。
    pub(crate) fn derive_triples(&self, sent: &Sentence) -> Vec<ComplexTriple> {
        let relevant = self.catalog.relevant_sefs(sent);
        log::debug!("[sefa] {} relevant SEFs", relevant.len());

        let triples = create_complex_triples(&relevant, sent);
        log::debug!("[sefa] {} complex triples", triples.len());

        let triples = filter_by_order(triples);
        log::debug!("[sefa] {} triples after order filtering", triples.len());

        let triples = eliminate_abstract_duplicates(triples);
        log::debug!("[sefa] {} final triples", triples.len());

        triples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let analyzer = Analyzer::with_defaults().unwrap().max_tokens(3);
        assert_eq!(analyzer.max_tokens_limit(), Some(3));
        assert!(!analyzer.persist_unknown());

        let analyzer = analyzer.max_tokens(0).persist_unknown_words(true);
        assert_eq!(analyzer.max_tokens_limit(), None);
        assert!(analyzer.persist_unknown());
    }

    #[test]
    fn test_shared_lexicon() {
        let lexicon = Arc::new(Lexicon::with_seed_vocabulary().unwrap());
        let catalog = Arc::new(SefCatalog::with_default_forms().unwrap());
        let a1 = Analyzer::from_shared(lexicon.clone(), catalog.clone());
        let a2 = Analyzer::from_shared(lexicon.clone(), catalog);

        a1.analyze("the florp struck the batter");
        assert!(a2.lexicon().contains("florp"));
    }

    #[test]
    fn test_derive_triples() {
        let analyzer = Analyzer::with_defaults().unwrap();
        let mut sent = Sentence::new();
        sent.set_sentence("old men eat fish");
        sent.compile(analyzer.lexicon(), false);

        let triples = analyzer.derive_triples(&sent);
        assert!(!triples.is_empty());
        assert!(
            triples
                .iter()
                .any(|t| t.sef().relation() == "CONSUME" && t.positions().relation == 3)
        );
    }
}
