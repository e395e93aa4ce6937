use std::io::{BufRead, BufReader, Read};

use hashbrown::HashSet;

use crate::errors::{Result, SefaError};
use crate::sef::Sef;
use crate::sentence::Sentence;

const DEFAULT_FORMS: &str = include_str!("resources/sef.def");

/// SEFの集合。
///
/// 宣言順は表示と候補生成の順序にのみ使われます。
#[derive(Clone, Debug, Default)]
pub struct SefCatalog {
    sefs: Vec<Sef>,
}

impl SefCatalog {
    /// 空の集合を作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// SEF定義からインスタンスを作成します。
    ///
    /// 各行は空白区切りの`左クラス 関係 右クラス`です。
    /// `#`以降はコメントとして扱い、空行は無視します。
    ///
    /// # 引数
    ///
    /// * `rdr` - `sef.def`形式のデータのリーダー
    ///
    /// # エラー
    ///
    /// タグが3つでない行がある場合に[`SefaError`]を返します。
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut sefs = vec![];
        for (i, line) in BufReader::new(rdr).lines().enumerate() {
            let line = line?;
            let line = line.find('#').map_or(line.as_str(), |j| &line[..j]).trim();
            if line.is_empty() {
                continue;
            }
            let cols: Vec<_> = line.split_whitespace().collect();
            if cols.len() != 3 {
                let msg = format!(
                    "A line must have exactly three tags, line {}: {:?}",
                    i + 1,
                    line
                );
                return Err(SefaError::invalid_format("sef.def", msg));
            }
            sefs.push(Sef::new(cols[0], cols[1], cols[2]));
        }
        Ok(Self { sefs })
    }

    /// 組み込みのSEF集合を読み込みます。
    pub fn with_default_forms() -> Result<Self> {
        Self::from_reader(DEFAULT_FORMS.as_bytes())
    }

    /// SEFを末尾に追加します。
    ///
    /// # エラー
    ///
    /// タグが空、または空白を含む場合に[`SefaError`]を返します。
    pub fn add_sef(&mut self, left: &str, relation: &str, right: &str) -> Result<()> {
        for (arg, tag) in [("left", left), ("relation", relation), ("right", right)] {
            if tag.is_empty() || tag.contains(char::is_whitespace) {
                return Err(SefaError::invalid_argument(
                    arg,
                    format!("A tag must be a non-empty word, {tag:?}"),
                ));
            }
        }
        self.sefs.push(Sef::new(left, relation, right));
        Ok(())
    }

    #[inline(always)]
    pub fn sefs(&self) -> &[Sef] {
        &self.sefs
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.sefs.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.sefs.is_empty()
    }

    /// 文に関係するSEFを選択します。
    ///
    /// 文中のいずれかの語位置に左クラスまたは右クラスが現れるSEFを集め、
    /// そのうち2つ以上の語位置で左右どちらかのクラスが満たされるものだけを残します。
    /// 後者が空になった場合は前者をそのまま返します。
    pub fn relevant_sefs(&self, sent: &Sentence) -> Vec<&Sef> {
        let all_classes: HashSet<&str> = sent
            .positions()
            .flat_map(|(_, w)| w.classes().iter().map(String::as_str))
            .collect();

        let relevant: Vec<&Sef> = self
            .sefs
            .iter()
            .filter(|s| all_classes.contains(s.left()) || all_classes.contains(s.right()))
            .collect();

        let recurring: Vec<&Sef> = relevant
            .iter()
            .copied()
            .filter(|s| {
                sent.positions()
                    .filter(|(_, w)| w.has_class(s.left()) || w.has_class(s.right()))
                    .count()
                    >= 2
            })
            .collect();

        if recurring.is_empty() {
            relevant
        } else {
            recurring
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::lexicon::Lexicon;

    fn compile(lexicon: &Lexicon, input: &str) -> Sentence {
        let mut sent = Sentence::new();
        sent.set_sentence(input);
        sent.compile(lexicon, false);
        sent
    }

    #[test]
    fn test_from_reader() {
        let data = "# comment\nN V N\n\n  PERSON   HIT PERSON # trailing\n";
        let catalog = SefCatalog::from_reader(data.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.sefs()[0], Sef::new("N", "V", "N"));
        assert_eq!(catalog.sefs()[1], Sef::new("PERSON", "HIT", "PERSON"));
    }

    #[test]
    fn test_from_reader_few_cols() {
        let data = "N V N\nPERSON HIT\n";
        let result = SefCatalog::from_reader(data.as_bytes());
        assert!(matches!(result, Err(SefaError::InvalidFormat(_))));
    }

    #[test]
    fn test_default_forms() {
        let catalog = SefCatalog::with_default_forms().unwrap();
        assert_eq!(catalog.len(), 59);
        assert_eq!(catalog.sefs()[0], Sef::new("N", "V", "N"));
        assert!(catalog.sefs().contains(&Sef::new("PERSON", "MOD", "EMOTION")));
        assert!(catalog.sefs().contains(&Sef::new("PERSON", "HIT", "PERSON")));
        assert_eq!(catalog.sefs()[58], Sef::new("PERSON", "R/P", "WHO"));
    }

    #[test]
    fn test_add_sef() {
        let mut catalog = SefCatalog::new();
        assert!(catalog.is_empty());
        catalog.add_sef("BIRD", "EQUIV", "BIRD").unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(matches!(
            catalog.add_sef("BIRD", "", "BIRD"),
            Err(SefaError::InvalidArgument(_))
        ));
        assert!(matches!(
            catalog.add_sef("BIG BIRD", "EQUIV", "BIRD"),
            Err(SefaError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_relevant_sefs_requires_two_positions() {
        let lexicon = Lexicon::with_seed_vocabulary().unwrap();
        let catalog = SefCatalog::with_default_forms().unwrap();
        let sent = compile(&lexicon, "old men eat fish");
        let relevant = catalog.relevant_sefs(&sent);

        assert!(relevant.contains(&&Sef::new("PERSON", "CONSUME", "FOOD")));
        assert!(relevant.contains(&&Sef::new("PERSON", "MOD", "AGE")));
        // ANIMAL is contributed by "fish" alone.
        assert!(!relevant.contains(&&Sef::new("ANIMAL", "CONSUME", "ANIMAL")));
        assert!(!relevant.contains(&&Sef::new("BIRD", "LOC", "PLACE")));
    }

    #[test]
    fn test_relevant_sefs_fallback() {
        let lexicon = Lexicon::with_seed_vocabulary().unwrap();
        let mut catalog = SefCatalog::new();
        catalog.add_sef("PERSON", "HIT", "PERSON").unwrap();
        catalog.add_sef("BIRD", "EQUIV", "BIRD").unwrap();

        let sent = compile(&lexicon, "pitcher");
        let relevant = catalog.relevant_sefs(&sent);
        assert_eq!(relevant, vec![&Sef::new("PERSON", "HIT", "PERSON")]);
    }
}
