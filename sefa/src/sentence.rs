//! 入力文の内部表現を提供するモジュール
//!
//! 入力文字列またはトークン列を正規化し、各語位置（1始まり）について
//! 語義の候補と、それらが寄与するクラスタグの集合を保持します。
//! 辞書に見つからない語は、語形の縮約を試した後に汎用語義で補われるため、
//! コンパイル後のすべての位置は空でないクラス集合を持ちます。

use hashbrown::HashSet;

use crate::lexicon::{Lexicon, WordSense};

/// 1つの語位置の情報
#[derive(Clone, Debug, Default)]
pub struct WordPosition {
    word: String,
    senses: Vec<WordSense>,
    classes: HashSet<String>,
}

impl WordPosition {
    fn new(word: String, senses: Vec<WordSense>) -> Self {
        let classes = senses
            .iter()
            .flat_map(|s| s.classes().map(str::to_string))
            .collect();
        Self {
            word,
            senses,
            classes,
        }
    }

    /// 正規化後の表層形を返します。
    #[inline(always)]
    pub fn word(&self) -> &str {
        &self.word
    }

    /// 語義の候補を返します。
    #[inline(always)]
    pub fn senses(&self) -> &[WordSense] {
        &self.senses
    }

    /// 統語クラスと意味クラスの集合を返します。
    #[inline(always)]
    pub const fn classes(&self) -> &HashSet<String> {
        &self.classes
    }

    /// `tag`がクラス集合に含まれるか判定します。
    #[inline(always)]
    pub fn has_class(&self, tag: &str) -> bool {
        self.classes.contains(tag)
    }
}

/// 入力文の内部表現を保持する構造体
///
/// # フィールド
///
/// * `tokens` - 正規化済みのトークン列
/// * `words` - 各語位置の情報。[`compile`](Self::compile)を呼ぶまでは空です
#[derive(Clone, Debug, Default)]
pub struct Sentence {
    tokens: Vec<String>,
    words: Vec<WordPosition>,
}

impl Sentence {
    /// 新しい空の `Sentence` インスタンスを生成します
    pub fn new() -> Self {
        Self::default()
    }

    /// 内部状態をクリアします
    #[inline(always)]
    pub fn clear(&mut self) {
        self.tokens.clear();
        self.words.clear();
    }

    /// 生の入力文字列を設定します
    ///
    /// 英数字と空白以外の文字を取り除き、小文字化した上で空白で分割します。
    pub fn set_sentence<S>(&mut self, input: S)
    where
        S: AsRef<str>,
    {
        self.clear();
        let cleaned: String = input
            .as_ref()
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        self.tokens
            .extend(cleaned.split_whitespace().map(str::to_string));
    }

    /// トークン化済みの入力を設定します
    ///
    /// 各トークンから英数字以外を取り除いて小文字化し、空になったトークンは捨てます。
    pub fn set_tokens<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.clear();
        self.tokens.extend(
            tokens
                .into_iter()
                .map(|t| normalize_token(t.as_ref()))
                .filter(|t| !t.is_empty()),
        );
    }

    /// トークン数を`max_tokens`以下に切り詰め、捨てたトークン数を返します
    pub(crate) fn truncate(&mut self, max_tokens: usize) -> usize {
        let dropped = self.tokens.len().saturating_sub(max_tokens);
        self.tokens.truncate(max_tokens);
        dropped
    }

    /// 各トークンを辞書で引き、語位置の表を構築します
    ///
    /// 辞書に見つからないトークンは[`reduction_candidates`]の順に縮約形を試し、
    /// それでも見つからなければ汎用語義を追加します。
    ///
    /// # 引数
    ///
    /// * `lexicon` - 語彙辞書
    /// * `persist_unknown` - 汎用語義をカスタム語彙ストアに永続化するかどうか
    pub fn compile(&mut self, lexicon: &Lexicon, persist_unknown: bool) {
        self.words.clear();
        for token in &self.tokens {
            let mut senses = lexicon.lookup(token);
            if senses.is_empty() {
                for candidate in reduction_candidates(token) {
                    senses = lexicon.lookup(&candidate);
                    if !senses.is_empty() {
                        log::debug!("[sefa] Auto-mapped '{token}' -> '{candidate}'");
                        break;
                    }
                }
            }
            if senses.is_empty() {
                log::debug!("[sefa] Unknown word '{token}': adding a generic noun sense");
                senses = lexicon.add_generic_sense(token, persist_unknown);
            }
            self.words.push(WordPosition::new(token.clone(), senses));
        }
    }

    /// 正規化済みのトークン列を返します
    #[inline(always)]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// 語位置の数を返します
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// 語位置が1つもないか判定します
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// 1始まりの語位置`pos`の情報を返します
    #[inline(always)]
    pub fn position(&self, pos: usize) -> Option<&WordPosition> {
        pos.checked_sub(1).and_then(|i| self.words.get(i))
    }

    /// `(語位置, 情報)`の組を先頭から順に返します
    pub fn positions(&self) -> impl Iterator<Item = (usize, &WordPosition)> {
        self.words.iter().enumerate().map(|(i, w)| (i + 1, w))
    }
}

/// トークンから英数字以外を取り除き、小文字化します
pub fn normalize_token(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// 辞書に見つからない語に対して試す縮約形を優先順に返します
///
/// 所有格の`'s`、`s`、`es`、`ed`、`ing`、`ly`の順に語尾を取り除きます。
pub fn reduction_candidates(word: &str) -> Vec<String> {
    const RULES: [(&str, usize); 6] = [
        ("'s", 0),
        ("s", 3),
        ("es", 4),
        ("ed", 3),
        ("ing", 4),
        ("ly", 3),
    ];

    let len = word.chars().count();
    RULES
        .iter()
        .filter(|(suffix, min_len)| len > *min_len && word.ends_with(suffix))
        .map(|(suffix, _)| word[..word.len() - suffix.len()].to_lowercase())
        .filter(|candidate| !candidate.is_empty())
        .collect()
}
