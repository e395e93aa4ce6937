//! 語彙辞書モジュール。
//!
//! 小文字化された単語から、宣言順に並んだ語義の列への対応を保持します。
//! 起動時に埋め込みのシード語彙から構築され、必要に応じて永続化された
//! カスタム語彙ストアの内容が加算的にマージされます。
//!
//! 解析中に未知語が現れた場合は[`Lexicon::add_generic_sense`]で汎用語義
//! （統語クラス`N`、意味クラス`OBJECT`）が追加されるため、辞書は実行中に
//! 単調に増加します。書き込みは単一ライターの[`RwLock`]で直列化され、
//! 読み込み側から追加途中のエントリが見えることはありません。
mod sense;
pub mod store;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use csv_core::ReadFieldResult;
use hashbrown::{HashMap, HashSet};

use crate::errors::{Result, SefaError};
use crate::lexicon::store::{CustomStore, SenseRecord};

pub use crate::lexicon::sense::WordSense;

const SEED_LEXICON: &str = include_str!("lexicon/resources/seed.csv");

/// 汎用語義の統語クラス。
pub const GENERIC_SYNTACTIC_CLASS: &str = "N";

/// 汎用語義の意味クラス。
pub const GENERIC_SEMANTIC_CLASS: &str = "OBJECT";

/// デフォルトのカスタム語彙ストアのパス。
///
/// ユーザー固有のローカルデータディレクトリ内の`sefa/custom_lexicon.bin`を指します。
/// - Linux: `$XDG_DATA_HOME/sefa` または `$HOME/.local/share/sefa`
/// - macOS: `$HOME/Library/Application Support/sefa`
/// - Windows: `{FOLDERID_LocalAppData}/sefa`
pub static DEFAULT_STORE_PATH: LazyLock<Option<PathBuf>> = LazyLock::new(|| {
    Some(dirs::data_local_dir()?.join("sefa").join("custom_lexicon.bin"))
});

/// 単語から語義列への対応を保持する語彙辞書。
///
/// 解析器からは[`Arc`](std::sync::Arc)で共有されます。
#[derive(Debug, Default)]
pub struct Lexicon {
    entries: RwLock<HashMap<String, Vec<WordSense>>>,
    store_path: Option<PathBuf>,
}

impl Lexicon {
    /// 空の辞書を作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// CSV形式の語彙定義から辞書を作成します。
    ///
    /// 各行は`単語,語義番号,統語クラス,素性,意味クラス[,意味クラス...]`の形式です。
    /// 素性は空白区切りで、空でも構いません。
    ///
    /// # 引数
    ///
    /// * `rdr` - CSVデータのリーダー
    ///
    /// # エラー
    ///
    /// 列が不足している場合、語義番号が整数でない場合、単語が空の場合に
    /// [`SefaError`]を返します。
    pub fn from_reader<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut buf = vec![];
        rdr.read_to_end(&mut buf)?;
        let lexicon = Self::new();
        for sense in Self::parse_csv(&buf, "lex.csv")? {
            lexicon.insert_sense(sense);
        }
        Ok(lexicon)
    }

    /// 埋め込みのシード語彙から辞書を作成します。
    ///
    /// # エラー
    ///
    /// 埋め込みデータが壊れている場合に[`SefaError`]を返します。
    pub fn with_seed_vocabulary() -> Result<Self> {
        Self::from_reader(SEED_LEXICON.as_bytes())
    }

    /// カスタム語彙ストアを読み込み、その内容をマージします。
    ///
    /// 以後、永続化を指定した汎用語義はこのパスに書き込まれます。
    /// ストアが存在しない、または読み込めない場合は警告を記録し、
    /// シード語彙のみで動作を続けます。
    ///
    /// # 引数
    ///
    /// * `path` - ストアファイルのパス
    pub fn with_custom_store<P>(mut self, path: P) -> Self
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref().to_path_buf();
        match CustomStore::load(&path) {
            Ok(store) => {
                let entries = self.entries.get_mut().unwrap_or_else(PoisonError::into_inner);
                for sense in store.senses() {
                    entries.entry(sense.word().to_string()).or_default().push(sense);
                }
            }
            Err(e) => {
                log::warn!(
                    "[sefa] Ignoring the custom lexicon store {}: {}",
                    path.display(),
                    e
                );
            }
        }
        self.store_path = Some(path);
        self
    }

    /// [`DEFAULT_STORE_PATH`]のカスタム語彙ストアを使用します。
    ///
    /// データディレクトリが解決できない環境では何もしません。
    pub fn with_default_custom_store(self) -> Self {
        match DEFAULT_STORE_PATH.as_deref() {
            Some(path) => self.with_custom_store(path),
            None => {
                log::warn!("[sefa] No local data directory is available for the custom lexicon store.");
                self
            }
        }
    }

    /// 設定されているカスタム語彙ストアのパスを返します。
    pub fn store_path(&self) -> Option<&Path> {
        self.store_path.as_deref()
    }

    /// 単語の語義列を返します。
    ///
    /// 大文字小文字を区別しません。見つからない場合は空の列を返します。
    pub fn lookup(&self, word: &str) -> Vec<WordSense> {
        self.read_entries()
            .get(word.to_lowercase().as_str())
            .cloned()
            .unwrap_or_default()
    }

    /// 単語が登録されているか判定します。
    pub fn contains(&self, word: &str) -> bool {
        self.read_entries().contains_key(word.to_lowercase().as_str())
    }

    /// 語義を追加します。
    ///
    /// 重複の除去は行いません。同じ語義を再度追加すると2つ目のエントリになります。
    ///
    /// # 引数
    ///
    /// * `word` - 見出し語
    /// * `sense_num` - 語義番号
    /// * `syntactic_class` - 統語クラス
    /// * `features` - 文法素性
    /// * `semantic_classes` - 意味クラス（具体的なものから順に）
    pub fn add_sense(
        &self,
        word: &str,
        sense_num: u32,
        syntactic_class: &str,
        features: &[&str],
        semantic_classes: &[&str],
    ) {
        self.insert_sense(WordSense::new(
            word,
            sense_num,
            syntactic_class,
            features.iter().copied(),
            semantic_classes.iter().copied(),
        ));
    }

    /// 構築済みの語義を追加します。
    pub fn insert_sense(&self, sense: WordSense) {
        self.write_entries()
            .entry(sense.word().to_string())
            .or_default()
            .push(sense);
    }

    /// 未知語に汎用語義を追加し、その単語の全語義を返します。
    ///
    /// 語義番号は既存の語義数に1を加えたものです。
    /// `persist`が`true`でカスタム語彙ストアが設定されている場合、
    /// 追加した語義をストアに書き込みます。書き込みの失敗は記録のみ行い、無視します。
    ///
    /// # 引数
    ///
    /// * `word` - 見出し語
    /// * `persist` - ストアに永続化するかどうか
    pub fn add_generic_sense(&self, word: &str, persist: bool) -> Vec<WordSense> {
        let word = word.to_lowercase();
        let mut entries = self.write_entries();
        let senses = entries.entry(word.clone()).or_default();
        let sense_num = u32::try_from(senses.len() + 1).unwrap_or(u32::MAX);
        let sense = WordSense::new(
            &word,
            sense_num,
            GENERIC_SYNTACTIC_CLASS,
            Vec::<String>::new(),
            [GENERIC_SEMANTIC_CLASS],
        );
        senses.push(sense.clone());
        let result = senses.clone();
        if persist {
            // The write lock is still held, so concurrent writers are serialized.
            self.persist(&word, &sense);
        }
        result
    }

    /// 単語の全語義が持つ統語クラスと意味クラスの和集合を返します。
    pub fn classes_for_word(&self, word: &str) -> HashSet<String> {
        let entries = self.read_entries();
        let mut classes = HashSet::new();
        if let Some(senses) = entries.get(word.to_lowercase().as_str()) {
            for sense in senses {
                classes.extend(sense.classes().map(str::to_string));
            }
        }
        classes
    }

    /// 登録されている単語数を返します。
    pub fn num_words(&self) -> usize {
        self.read_entries().len()
    }

    /// 登録されている語義の総数を返します。
    pub fn num_senses(&self) -> usize {
        self.read_entries().values().map(Vec::len).sum()
    }

    fn persist(&self, word: &str, sense: &WordSense) {
        let Some(path) = self.store_path.as_deref() else {
            log::debug!("[sefa] No custom lexicon store is configured; '{word}' is kept in memory.");
            return;
        };
        let result = CustomStore::load(path).and_then(|mut store| {
            store.push(word, SenseRecord::from(sense));
            store.save(path)
        });
        if let Err(e) = result {
            log::warn!(
                "[sefa] Failed to persist '{}' to {}: {}",
                word,
                path.display(),
                e
            );
        }
    }

    fn read_entries(&self) -> RwLockReadGuard<'_, HashMap<String, Vec<WordSense>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, HashMap<String, Vec<WordSense>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn parse_csv(mut bytes: &[u8], name: &'static str) -> Result<Vec<WordSense>> {
        let mut senses = vec![];

        let mut rdr = csv_core::Reader::new();
        let mut output = [0; 4096];
        let mut field = vec![];
        let mut fields: Vec<String> = vec![];

        loop {
            let (result, nin, nout) = rdr.read_field(bytes, &mut output);
            field.extend_from_slice(&output[..nout]);
            bytes = &bytes[nin..];
            match result {
                ReadFieldResult::InputEmpty | ReadFieldResult::OutputFull => continue,
                ReadFieldResult::Field { record_end } => {
                    fields.push(std::str::from_utf8(&field)?.trim().to_string());
                    field.clear();
                    if record_end {
                        if !(fields.len() == 1 && fields[0].is_empty()) {
                            senses.push(Self::parse_row(&fields, name)?);
                        }
                        fields.clear();
                    }
                }
                ReadFieldResult::End => break,
            }
        }
        Ok(senses)
    }

    fn parse_row(fields: &[String], name: &'static str) -> Result<WordSense> {
        if fields.len() < 5 {
            let msg = format!(
                "A csv row of lexicon must have five items at least, {:?}",
                fields.join(",")
            );
            return Err(SefaError::invalid_format(name, msg));
        }
        if fields[0].is_empty() {
            let msg = format!("The word must not be empty, {:?}", fields.join(","));
            return Err(SefaError::invalid_format(name, msg));
        }
        let sense_num: u32 = fields[1].parse()?;
        let semantic_classes: Vec<&str> = fields[4..]
            .iter()
            .map(String::as_str)
            .filter(|c| !c.is_empty())
            .collect();
        if fields[2].is_empty() || semantic_classes.is_empty() {
            let msg = format!(
                "A syntactic class and at least one semantic class are required, {:?}",
                fields.join(",")
            );
            return Err(SefaError::invalid_format(name, msg));
        }
        Ok(WordSense::new(
            &fields[0],
            sense_num,
            &fields[2],
            fields[3].split_whitespace(),
            semantic_classes,
        ))
    }
}
