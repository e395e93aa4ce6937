use std::collections::BTreeSet;
use std::fmt;

/// 単語の1つの語義。
///
/// 統語クラスは1つだけですが、意味クラスは具体的なものから抽象的なものへ
/// 順序付けられた列として保持します。この順序は根の選択で特定性の
/// ボーナスを計算するときに参照されます。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordSense {
    word: String,
    sense_num: u32,
    syntactic_class: String,
    features: BTreeSet<String>,
    semantic_classes: Vec<String>,
}

impl WordSense {
    /// 新しい語義を作成します。
    ///
    /// `word`は小文字化されます。
    ///
    /// # 引数
    ///
    /// * `word` - 見出し語
    /// * `sense_num` - 語義番号（1始まり）
    /// * `syntactic_class` - 統語クラス（`N`、`V`、`ADJ`など）
    /// * `features` - 文法素性（`SING`、`PAST`など）
    /// * `semantic_classes` - 意味クラス（具体的なものから順に）
    pub fn new<F, C, S, T>(
        word: &str,
        sense_num: u32,
        syntactic_class: &str,
        features: F,
        semantic_classes: C,
    ) -> Self
    where
        F: IntoIterator<Item = S>,
        S: Into<String>,
        C: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            word: word.to_lowercase(),
            sense_num,
            syntactic_class: syntactic_class.to_string(),
            features: features.into_iter().map(Into::into).collect(),
            semantic_classes: semantic_classes.into_iter().map(Into::into).collect(),
        }
    }

    /// 見出し語を返します。
    #[inline(always)]
    pub fn word(&self) -> &str {
        &self.word
    }

    /// 語義番号を返します。
    #[inline(always)]
    pub const fn sense_num(&self) -> u32 {
        self.sense_num
    }

    /// 統語クラスを返します。
    #[inline(always)]
    pub fn syntactic_class(&self) -> &str {
        &self.syntactic_class
    }

    /// 文法素性の集合を返します。
    #[inline(always)]
    pub const fn features(&self) -> &BTreeSet<String> {
        &self.features
    }

    /// 意味クラスの列を返します。
    #[inline(always)]
    pub fn semantic_classes(&self) -> &[String] {
        &self.semantic_classes
    }

    /// `tag`が統語クラスまたは意味クラスのいずれかに一致するか判定します。
    pub fn matches_class(&self, tag: &str) -> bool {
        self.syntactic_class == tag || self.semantic_rank(tag).is_some()
    }

    /// 意味クラス列における`tag`の位置を返します。
    ///
    /// 含まれない場合は`None`を返します。
    pub fn semantic_rank(&self, tag: &str) -> Option<usize> {
        self.semantic_classes.iter().position(|c| c == tag)
    }

    /// この語義が寄与するすべてのクラスタグを返します。
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.syntactic_class.as_str())
            .chain(self.semantic_classes.iter().map(String::as_str))
    }

    /// `word_n`形式の識別子を返します。
    pub fn label(&self) -> String {
        format!("{}_{}", self.word, self.sense_num)
    }
}

impl fmt::Display for WordSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}, [{}])",
            self.label(),
            self.syntactic_class,
            self.semantic_classes.join(", ")
        )
    }
}
