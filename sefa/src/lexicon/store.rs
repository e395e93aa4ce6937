//! カスタム語彙ストア。
//!
//! 未知語に対して自動生成された汎用語義を永続化するためのファイル形式です。
//! ファイルはマジックバイト、16バイト境界へのパディング、rkyvアーカイブの順で構成されます。
//! 書き込みは同一ディレクトリ内の一時ファイルを経由し、最後にアトミックに置き換えます。

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use rkyv::rancor::Error;
use rkyv::util::AlignedVec;
use rkyv::{Archive, Deserialize, Serialize};

use crate::errors::{Result, SefaError};
use crate::lexicon::WordSense;

/// カスタム語彙ストアを識別するマジックバイト。
pub const STORE_MAGIC: &[u8] = b"SefaCustomLexiconRkyv 0.1\n";

const STORE_MAGIC_LEN: usize = STORE_MAGIC.len();
const RKYV_ALIGNMENT: usize = 16;
const PADDING_LEN: usize = (RKYV_ALIGNMENT - (STORE_MAGIC_LEN % RKYV_ALIGNMENT)) % RKYV_ALIGNMENT;

/// 永続化された1語義分のレコード。
#[derive(Archive, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SenseRecord {
    pub sense_num: u32,
    pub syntactic_class: String,
    pub features: Vec<String>,
    pub semantic_classes: Vec<String>,
}

impl SenseRecord {
    /// レコードを語義に変換します。
    pub fn to_sense(&self, word: &str) -> WordSense {
        WordSense::new(
            word,
            self.sense_num,
            &self.syntactic_class,
            self.features.iter().cloned(),
            self.semantic_classes.iter().cloned(),
        )
    }
}

impl From<&WordSense> for SenseRecord {
    fn from(sense: &WordSense) -> Self {
        Self {
            sense_num: sense.sense_num(),
            syntactic_class: sense.syntactic_class().to_string(),
            features: sense.features().iter().cloned().collect(),
            semantic_classes: sense.semantic_classes().to_vec(),
        }
    }
}

/// 1単語分のエントリ。
#[derive(Archive, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CustomEntry {
    pub word: String,
    pub senses: Vec<SenseRecord>,
}

/// カスタム語彙ストアの内容。
///
/// 単語はストアに初めて現れた順に並びます。
#[derive(Archive, Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomStore {
    pub entries: Vec<CustomEntry>,
}

impl CustomStore {
    /// 単語に語義レコードを追加します。
    ///
    /// 同じ単語のエントリが既にあれば末尾に追加し、なければ新しいエントリを作成します。
    pub fn push(&mut self, word: &str, record: SenseRecord) {
        let word = word.to_lowercase();
        if let Some(entry) = self.entries.iter_mut().find(|e| e.word == word) {
            entry.senses.push(record);
        } else {
            self.entries.push(CustomEntry {
                word,
                senses: vec![record],
            });
        }
    }

    /// 格納されているすべての語義を列挙します。
    pub fn senses(&self) -> impl Iterator<Item = WordSense> {
        self.entries
            .iter()
            .flat_map(|e| e.senses.iter().map(|r| r.to_sense(&e.word)))
    }

    /// ストアをライターに書き出します。
    ///
    /// # エラー
    ///
    /// 書き込みまたはrkyvシリアライゼーションに失敗した場合にエラーを返します。
    pub fn write<W>(&self, mut wtr: W) -> Result<()>
    where
        W: Write,
    {
        wtr.write_all(STORE_MAGIC)?;
        wtr.write_all(&[0xFF; PADDING_LEN])?;
        let bytes = rkyv::to_bytes::<Error>(self)?;
        wtr.write_all(&bytes)?;
        Ok(())
    }

    /// リーダーからストアを読み込みます。
    ///
    /// # エラー
    ///
    /// マジックバイトが一致しない場合、またはアーカイブの検証に失敗した場合に
    /// エラーを返します。
    pub fn read<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut magic = [0; STORE_MAGIC_LEN];
        rdr.read_exact(&mut magic)?;
        if magic != STORE_MAGIC {
            return Err(SefaError::invalid_argument(
                "rdr",
                "The magic number of the custom lexicon store mismatches.",
            ));
        }

        let mut padding_buf = [0; PADDING_LEN];
        rdr.read_exact(&mut padding_buf)?;

        let mut buffer = Vec::new();
        rdr.read_to_end(&mut buffer)?;

        let mut aligned_bytes: AlignedVec = AlignedVec::with_capacity(buffer.len());
        aligned_bytes.extend_from_slice(&buffer);

        rkyv::from_bytes::<Self, Error>(&aligned_bytes).map_err(|e| {
            SefaError::invalid_state(
                "rkyv validation failed. The custom lexicon store may be corrupted.",
                e.to_string(),
            )
        })
    }

    /// パスからストアを読み込みます。
    ///
    /// ファイルが存在しない場合は空のストアを返します。
    pub fn load<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        match File::open(path.as_ref()) {
            Ok(file) => Self::read(io::BufReader::new(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// ストアをパスへアトミックに保存します。
    ///
    /// 親ディレクトリが存在しない場合は作成します。
    pub fn save<P>(&self, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut temp_file = tempfile::NamedTempFile::new_in(dir)?;
        {
            let mut wtr = io::BufWriter::new(temp_file.as_file_mut());
            self.write(&mut wtr)?;
            wtr.flush()?;
        }
        temp_file.as_file().sync_all()?;
        temp_file.persist(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generic_record(sense_num: u32) -> SenseRecord {
        SenseRecord {
            sense_num,
            syntactic_class: "N".to_string(),
            features: vec![],
            semantic_classes: vec!["OBJECT".to_string()],
        }
    }

    #[test]
    fn test_write_read() {
        let mut store = CustomStore::default();
        store.push("Xyzzy", generic_record(1));
        store.push("plugh", generic_record(1));
        store.push("xyzzy", generic_record(2));

        let mut buf = vec![];
        store.write(&mut buf).unwrap();
        assert!(buf.starts_with(STORE_MAGIC));

        let other = CustomStore::read(buf.as_slice()).unwrap();
        assert_eq!(store, other);
        assert_eq!(other.entries.len(), 2);
        assert_eq!(other.entries[0].word, "xyzzy");
        assert_eq!(other.entries[0].senses.len(), 2);
    }

    #[test]
    fn test_read_bad_magic() {
        let data = b"NotACustomLexicon\n0000000000000000";
        let result = CustomStore::read(&data[..]);
        assert!(matches!(result, Err(SefaError::InvalidArgument(_))));
    }

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = CustomStore::load(dir.path().join("missing.bin")).unwrap();
        assert!(store.entries.is_empty());
    }

    #[test]
    fn test_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("custom.bin");

        let mut store = CustomStore::default();
        store.push("frobnicate", generic_record(1));
        store.save(&path).unwrap();

        let loaded = CustomStore::load(&path).unwrap();
        let senses: Vec<_> = loaded.senses().collect();
        assert_eq!(senses.len(), 1);
        assert_eq!(senses[0].word(), "frobnicate");
        assert_eq!(senses[0].semantic_classes(), ["OBJECT".to_string()]);
    }
}
