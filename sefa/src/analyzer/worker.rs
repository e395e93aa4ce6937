//! 解析処理のためのルーチンを提供するモジュール。
//!
//! ワーカーは内部データ構造を保持し、再利用することで不要なメモリアロケーションを避けます。
use crate::analyzer::Analyzer;
use crate::analyzer::senses;
use crate::analyzer::structure::{assemble, select_roots};
use crate::interpretation::{Interpretation, SensedInterpretation};
use crate::sef::ComplexTriple;
use crate::sentence::Sentence;

/// 解析処理のためのルーチンを提供する構造体。
///
/// # 例
///
/// ```
/// use sefa::Analyzer;
///
/// let analyzer = Analyzer::with_defaults()?;
/// let mut worker = analyzer.new_worker();
///
/// worker.reset_sentence("old men eat fish");
/// worker.analyze();
/// assert!(worker.num_interpretations() > 0);
///
/// let first = worker.interpretation(0).unwrap();
/// assert_eq!(first.sef().relation(), "CONSUME");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Worker {
    pub(crate) analyzer: Analyzer,
    pub(crate) sent: Sentence,
    pub(crate) final_triples: Vec<ComplexTriple>,
    pub(crate) interpretations: Vec<Interpretation>,
}

impl Worker {
    pub(crate) fn new(analyzer: Analyzer) -> Self {
        Self {
            analyzer,
            sent: Sentence::new(),
            final_triples: vec![],
            interpretations: vec![],
        }
    }

    /// 解析する入力文をリセットします。
    ///
    /// 入力を正規化し、各語位置を語彙辞書で引きます。
    /// 以前の解析結果は破棄されます。
    ///
    /// # 引数
    ///
    /// * `input` - 解析する入力文字列
    pub fn reset_sentence<S>(&mut self, input: S)
    where
        S: AsRef<str>,
    {
        self.sent.set_sentence(input);
        self.prepare();
    }

    /// トークン化済みの入力で解析対象をリセットします。
    ///
    /// # 引数
    ///
    /// * `tokens` - 解析するトークン列
    pub fn reset_tokens<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.sent.set_tokens(tokens);
        self.prepare();
    }

    fn prepare(&mut self) {
        self.final_triples.clear();
        self.interpretations.clear();
        if let Some(max_tokens) = self.analyzer.max_tokens_limit() {
            let dropped = self.sent.truncate(max_tokens);
            if dropped != 0 {
                log::warn!("[sefa] Dropped {dropped} tokens beyond the limit of {max_tokens}");
            }
        }
        self.sent
            .compile(self.analyzer.lexicon(), self.analyzer.persist_unknown());
    }

    /// 設定された入力文を解析します。
    ///
    /// 結果は内部状態に保存され、[`interpretation()`](Self::interpretation)などで
    /// アクセスできます。空の文が設定されている場合は何も行いません。
    pub fn analyze(&mut self) {
        self.final_triples.clear();
        self.interpretations.clear();
        if self.sent.is_empty() {
            return;
        }

        self.final_triples = self.analyzer.derive_triples(&self.sent);
        let roots = select_roots(&self.final_triples, &self.sent);
        log::debug!("[sefa] {} roots selected", roots.len());

        self.interpretations = roots
            .into_iter()
            .map(|root| assemble(root, &self.final_triples))
            .collect();
        for i in 0..self.interpretations.len() {
            log::debug!(
                "[sefa] Interpretation {i} is {}: {}",
                if self.is_complete(i) { "complete" } else { "partial" },
                self.interpretations[i]
            );
        }
    }

    /// 正規化と辞書引きが済んだ文を返します。
    #[inline(always)]
    pub const fn sentence(&self) -> &Sentence {
        &self.sent
    }

    /// 4段階の変換を経た最終的な3つ組を返します。
    #[inline(always)]
    pub fn final_triples(&self) -> &[ComplexTriple] {
        &self.final_triples
    }

    /// 解釈の数を返します。
    #[inline(always)]
    pub fn num_interpretations(&self) -> usize {
        self.interpretations.len()
    }

    /// `i`番目の解釈を返します。
    ///
    /// # 引数
    ///
    /// * `i` - 解釈のインデックス（0から始まる）
    #[inline(always)]
    pub fn interpretation(&self, i: usize) -> Option<&Interpretation> {
        self.interpretations.get(i)
    }

    #[inline(always)]
    pub fn interpretations(&self) -> &[Interpretation] {
        &self.interpretations
    }

    /// `i`番目の解釈が文中のすべての語位置を束縛しているか判定します。
    ///
    /// 解釈が存在しない場合は`false`を返します。
    pub fn is_complete(&self, i: usize) -> bool {
        self.interpretations.get(i).is_some_and(|interp| {
            let covered = interp.covered_positions();
            covered.len() == self.sent.len() && covered.iter().all(|&p| p <= self.sent.len())
        })
    }

    /// `i`番目の解釈に語義番号を注釈します。
    ///
    /// # 戻り値
    ///
    /// 解釈が存在する場合は`Some(注釈済みの木)`、存在しない場合は`None`
    pub fn select_word_senses(&self, i: usize) -> Option<SensedInterpretation> {
        self.interpretations
            .get(i)
            .map(|interp| senses::select_word_senses(interp, &self.sent))
    }

    /// ワーカーを消費し、解釈を返します。
    pub fn into_interpretations(self) -> Vec<Interpretation> {
        self.interpretations
    }
}
