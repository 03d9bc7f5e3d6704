use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::store::schema::{
    Bookmark, BookmarkData, Word, WordListData, WordSet, WordSetData,
};
use crate::store::{
    BookmarkStorage, StorageProvider, StoreError, StoreResult, WORD_MODEL, WordSetStorage,
    WordStorage,
};

const WORD_SETS_FILE: &str = "word_sets.json";
const BOOKMARKS_FILE: &str = "bookmarks.json";

fn read_json<T: DeserializeOwned + Default>(path: &Path) -> StoreResult<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn write_json<T: Serialize>(path: &Path, data: &T) -> StoreResult<()> {
    let tmp_path = path.with_extension("tmp");

    let json = serde_json::to_string_pretty(data)?;
    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;

    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Model directories word lists are kept in, shared by every handle of one store.
type Models = Rc<RefCell<BTreeSet<String>>>;

/// Word list files of the known model directories below `base_dir`.
fn word_list_files(base_dir: &Path, models: &Models) -> StoreResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for model in models.borrow().iter() {
        let dir = base_dir.join(model);
        if !dir.is_dir() {
            continue;
        }
        for file in fs::read_dir(&dir)? {
            let path = file?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

fn require(value: &str, field: &'static str) -> StoreResult<()> {
    if value.trim().is_empty() {
        Err(StoreError::EmptyField(field))
    } else {
        Ok(())
    }
}

/// File-backed storage rooted at one data directory.
pub struct JsonStore {
    base_dir: PathBuf,
    models: Models,
}

impl JsonStore {
    pub fn new() -> StoreResult<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vocadr");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> StoreResult<Self> {
        fs::create_dir_all(&base_dir)?;
        let models = BTreeSet::from([WORD_MODEL.to_string()]);
        Ok(Self {
            base_dir,
            models: Rc::new(RefCell::new(models)),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl StorageProvider for JsonStore {
    fn word_sets(&self) -> Rc<dyn WordSetStorage> {
        Rc::new(JsonWordSetStore {
            base_dir: self.base_dir.clone(),
            models: Rc::clone(&self.models),
        })
    }

    fn bookmarks(&self) -> Rc<dyn BookmarkStorage> {
        Rc::new(JsonBookmarkStore {
            path: self.base_dir.join(BOOKMARKS_FILE),
        })
    }

    fn open_word_list(
        &self,
        model: &str,
        title: &str,
        parent_id: Uuid,
    ) -> StoreResult<Rc<dyn WordStorage>> {
        let dir = self.base_dir.join(model);
        fs::create_dir_all(&dir)?;
        self.models.borrow_mut().insert(model.to_string());
        let path = dir.join(format!("{parent_id}.json"));

        let data = if path.exists() {
            let mut data: WordListData = serde_json::from_str(&fs::read_to_string(&path)?)?;
            if data.title != title {
                data.title = title.to_string();
                write_json(&path, &data)?;
            }
            data
        } else {
            let data = WordListData::new(parent_id, title);
            write_json(&path, &data)?;
            tracing::debug!(%parent_id, model, "created word list");
            data
        };

        Ok(Rc::new(JsonWordListStore {
            path,
            parent_id,
            title: data.title,
        }))
    }

    fn word_bank(&self) -> StoreResult<Vec<Word>> {
        let mut words = Vec::new();
        for path in word_list_files(&self.base_dir, &self.models)? {
            let data: WordListData = serde_json::from_str(&fs::read_to_string(&path)?)?;
            words.extend(data.words);
        }
        Ok(words)
    }
}

pub struct JsonWordSetStore {
    base_dir: PathBuf,
    models: Models,
}

impl JsonWordSetStore {
    fn path(&self) -> PathBuf {
        self.base_dir.join(WORD_SETS_FILE)
    }

    fn load(&self) -> StoreResult<WordSetData> {
        let mut data: WordSetData = read_json(&self.path())?;
        data.sets.sort_by_key(|s| s.position);
        Ok(data)
    }
}

impl WordSetStorage for JsonWordSetStore {
    fn create(&self, title: &str) -> StoreResult<WordSet> {
        require(title, "title")?;
        let mut data = self.load()?;
        let position = data.sets.last().map(|s| s.position + 1).unwrap_or(0);
        let set = WordSet {
            id: Uuid::new_v4(),
            title: title.trim().to_string(),
            created_at: Utc::now(),
            position,
        };
        data.sets.push(set.clone());
        write_json(&self.path(), &data)?;
        Ok(set)
    }

    fn list(&self) -> StoreResult<Vec<WordSet>> {
        Ok(self.load()?.sets)
    }

    fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut data = self.load()?;
        let idx = data
            .sets
            .iter()
            .position(|s| s.id == id)
            .ok_or(StoreError::NotFound(id))?;
        data.sets.remove(idx);
        write_json(&self.path(), &data)?;

        let list_name = format!("{id}.json");
        for path in word_list_files(&self.base_dir, &self.models)? {
            if path.file_name().and_then(|n| n.to_str()) == Some(list_name.as_str()) {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    fn reorder(&self, from: usize, to: usize) -> StoreResult<()> {
        let mut data = self.load()?;
        let len = data.sets.len();
        for index in [from, to] {
            if index >= len {
                return Err(StoreError::InvalidIndex { index, len });
            }
        }
        let moved = data.sets.remove(from);
        data.sets.insert(to, moved);
        for (i, set) in data.sets.iter_mut().enumerate() {
            set.position = i as u32;
        }
        write_json(&self.path(), &data)
    }
}

pub struct JsonWordListStore {
    path: PathBuf,
    parent_id: Uuid,
    title: String,
}

impl JsonWordListStore {
    fn load(&self) -> StoreResult<WordListData> {
        if self.path.exists() {
            Ok(serde_json::from_str(&fs::read_to_string(&self.path)?)?)
        } else {
            Ok(WordListData::new(self.parent_id, &self.title))
        }
    }
}

impl WordStorage for JsonWordListStore {
    fn title(&self) -> &str {
        &self.title
    }

    fn parent_id(&self) -> Uuid {
        self.parent_id
    }

    fn create(&self, definition: &str, meaning: &str) -> StoreResult<Word> {
        require(definition, "definition")?;
        require(meaning, "meaning")?;
        let mut data = self.load()?;
        let word = Word::new(self.parent_id, definition, meaning);
        data.words.push(word.clone());
        write_json(&self.path, &data)?;
        Ok(word)
    }

    fn list(&self) -> StoreResult<Vec<Word>> {
        Ok(self.load()?.words)
    }

    fn update(&self, word: &Word) -> StoreResult<()> {
        require(&word.definition, "definition")?;
        require(&word.meaning, "meaning")?;
        let mut data = self.load()?;
        let slot = data
            .words
            .iter_mut()
            .find(|w| w.id == word.id)
            .ok_or(StoreError::NotFound(word.id))?;
        *slot = word.clone();
        write_json(&self.path, &data)
    }

    fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut data = self.load()?;
        let before = data.words.len();
        data.words.retain(|w| w.id != id);
        if data.words.len() == before {
            return Err(StoreError::NotFound(id));
        }
        write_json(&self.path, &data)
    }
}

pub struct JsonBookmarkStore {
    path: PathBuf,
}

impl BookmarkStorage for JsonBookmarkStore {
    fn list(&self) -> StoreResult<Vec<Bookmark>> {
        let data: BookmarkData = read_json(&self.path)?;
        Ok(data.bookmarks)
    }

    fn add(&self, bookmark: Bookmark) -> StoreResult<()> {
        let mut data: BookmarkData = read_json(&self.path)?;
        data.bookmarks.insert(0, bookmark);
        write_json(&self.path, &data)
    }

    fn remove(&self, index: usize) -> StoreResult<Bookmark> {
        let mut data: BookmarkData = read_json(&self.path)?;
        let len = data.bookmarks.len();
        if index >= len {
            return Err(StoreError::InvalidIndex { index, len });
        }
        let removed = data.bookmarks.remove(index);
        write_json(&self.path, &data)?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::{Language, Mark};
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    fn bookmark(source: &str, translated: &str) -> Bookmark {
        Bookmark {
            source_language: Language::En,
            target_language: Language::Ko,
            source_text: source.to_string(),
            translated_text: translated.to_string(),
        }
    }

    #[test]
    fn test_word_sets_created_in_position_order() {
        let (_dir, store) = make_test_store();
        let sets = store.word_sets();
        sets.create("animals").unwrap();
        sets.create("fruit").unwrap();

        let listed = sets.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "animals");
        assert_eq!(listed[0].position, 0);
        assert_eq!(listed[1].position, 1);
    }

    #[test]
    fn test_create_rejects_blank_title() {
        let (_dir, store) = make_test_store();
        let err = store.word_sets().create("   ").unwrap_err();
        assert!(matches!(err, StoreError::EmptyField("title")));
        assert!(store.word_sets().list().unwrap().is_empty());
    }

    #[test]
    fn test_reorder_keeps_ids_and_renumbers() {
        let (_dir, store) = make_test_store();
        let sets = store.word_sets();
        let a = sets.create("a").unwrap();
        let b = sets.create("b").unwrap();
        let c = sets.create("c").unwrap();

        sets.reorder(2, 0).unwrap();

        let listed = sets.list().unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![c.id, a.id, b.id]);
        let positions: Vec<u32> = listed.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_reorder_out_of_range() {
        let (_dir, store) = make_test_store();
        let sets = store.word_sets();
        sets.create("a").unwrap();
        let err = sets.reorder(0, 3).unwrap_err();
        assert!(matches!(err, StoreError::InvalidIndex { index: 3, len: 1 }));
    }

    #[test]
    fn test_open_word_list_creates_then_reuses() {
        let (dir, store) = make_test_store();
        let parent = Uuid::new_v4();

        let list = store.open_word_list("words", "animals", parent).unwrap();
        assert_eq!(list.title(), "animals");
        assert!(dir.path().join("words").join(format!("{parent}.json")).exists());
        list.create("dog", "개").unwrap();

        let reopened = store.open_word_list("words", "animals", parent).unwrap();
        assert_eq!(reopened.list().unwrap().len(), 1);
    }

    #[test]
    fn test_update_word_mark() {
        let (_dir, store) = make_test_store();
        let list = store.open_word_list("words", "fruit", Uuid::new_v4()).unwrap();
        let word = list.create("apple", "사과").unwrap();

        list.update(&word.with_mark(Mark::Right)).unwrap();

        let words = list.list().unwrap();
        assert_eq!(words[0].mark, Mark::Right);
    }

    #[test]
    fn test_update_rejects_blank_fields() {
        let (_dir, store) = make_test_store();
        let list = store.open_word_list(WORD_MODEL, "fruit", Uuid::new_v4()).unwrap();
        let word = list.create("apple", "사과").unwrap();
        let blank = Word {
            meaning: " ".to_string(),
            ..word.clone()
        };
        assert!(matches!(list.update(&blank), Err(StoreError::EmptyField("meaning"))));
        assert_eq!(list.list().unwrap(), vec![word]);
    }

    #[test]
    fn test_update_unknown_word_is_not_found() {
        let (_dir, store) = make_test_store();
        let list = store.open_word_list("words", "fruit", Uuid::new_v4()).unwrap();
        let stray = Word::new(list.parent_id(), "pear", "배");
        assert!(matches!(list.update(&stray), Err(StoreError::NotFound(id)) if id == stray.id));
    }

    #[test]
    fn test_delete_set_removes_its_word_list() {
        let (dir, store) = make_test_store();
        let set = store.word_sets().create("animals").unwrap();
        let list = store.open_word_list("words", &set.title, set.id).unwrap();
        list.create("cat", "고양이").unwrap();

        store.word_sets().delete(set.id).unwrap();

        assert!(store.word_sets().list().unwrap().is_empty());
        assert!(!dir.path().join("words").join(format!("{}.json", set.id)).exists());
    }

    #[test]
    fn test_word_bank_collects_all_lists() {
        let (_dir, store) = make_test_store();
        store
            .open_word_list("words", "a", Uuid::new_v4())
            .unwrap()
            .create("dog", "개")
            .unwrap();
        store
            .open_word_list("words", "b", Uuid::new_v4())
            .unwrap()
            .create("cat", "고양이")
            .unwrap();

        let mut bank: Vec<String> = store
            .word_bank()
            .unwrap()
            .into_iter()
            .map(|w| w.definition)
            .collect();
        bank.sort();
        assert_eq!(bank, vec!["cat", "dog"]);
    }

    #[test]
    fn test_foreign_json_outside_word_lists_is_ignored() {
        let (dir, store) = make_test_store();
        let set = store.word_sets().create("animals").unwrap();
        store
            .open_word_list(WORD_MODEL, &set.title, set.id)
            .unwrap()
            .create("cat", "고양이")
            .unwrap();
        let backup = dir.path().join("backup");
        fs::create_dir_all(&backup).unwrap();
        fs::write(backup.join("notes.json"), "{}").unwrap();
        let stray = backup.join(format!("{}.json", set.id));
        fs::write(&stray, "{}").unwrap();

        let bank = store.word_bank().unwrap();
        assert_eq!(bank.len(), 1);
        assert_eq!(bank[0].definition, "cat");

        store.word_sets().delete(set.id).unwrap();
        assert!(stray.exists());
        assert!(store.word_bank().unwrap().is_empty());
    }

    #[test]
    fn test_other_models_join_the_word_bank() {
        let (_dir, store) = make_test_store();
        store
            .open_word_list("phrases", "travel", Uuid::new_v4())
            .unwrap()
            .create("where is", "어디")
            .unwrap();
        let bank = store.word_bank().unwrap();
        assert_eq!(bank.len(), 1);
        assert_eq!(bank[0].meaning, "어디");
    }

    #[test]
    fn test_first_bookmark_persisted() {
        let (_dir, store) = make_test_store();
        let bookmarks = store.bookmarks();
        assert!(bookmarks.list().unwrap().is_empty());

        let saved = bookmark("hello", "안녕");
        bookmarks.add(saved.clone()).unwrap();

        let reloaded = store.bookmarks().list().unwrap();
        assert_eq!(reloaded, vec![saved]);
    }

    #[test]
    fn test_bookmarks_newest_first() {
        let (_dir, store) = make_test_store();
        let bookmarks = store.bookmarks();
        bookmarks.add(bookmark("one", "하나")).unwrap();
        bookmarks.add(bookmark("two", "둘")).unwrap();

        let listed = store.bookmarks().list().unwrap();
        assert_eq!(listed[0].source_text, "two");
        assert_eq!(listed[1].source_text, "one");

        let removed = bookmarks.remove(0).unwrap();
        assert_eq!(removed.source_text, "two");
        assert_eq!(store.bookmarks().list().unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_file_surfaces_error() {
        let (dir, store) = make_test_store();
        fs::write(dir.path().join(WORD_SETS_FILE), "{not json").unwrap();
        assert!(matches!(store.word_sets().list(), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_no_tmp_files_left_after_save() {
        let (dir, store) = make_test_store();
        store.word_sets().create("animals").unwrap();
        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty(), "no residual .tmp files");
    }
}
