//Copyright 2024 Felix Engl
//
//Licensed under the Apache License, Version 2.0 (the "License");
//you may not use this file except in compliance with the License.
//You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
//Unless required by applicable law or agreed to in writing, software
//distributed under the License is distributed on an "AS IS" BASIS,
//WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//See the License for the specific language governing permissions and
//limitations under the License.

mod error;

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use camino::Utf8Path;
use encoding_rs::mem::decode_latin1;
use itertools::Itertools;

pub use error::{DatasetError, SchemaError};

/// A tweet with its sentiment code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub target: i64,
    pub text: String,
}

/// A table of text fields with named columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Loads a csv file without a header, the fields are decoded as latin-1
    /// and bound to [columns] by position. Every byte maps to the code point of
    /// the same value, 0x80 to 0x9F are the C1 controls and not windows-1252.
    pub fn load<P: AsRef<Utf8Path>, S: AsRef<str>>(path: P, columns: &[S]) -> Result<Self, DatasetError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file), columns)
    }

    pub fn from_reader<R: Read, S: AsRef<str>>(reader: R, columns: &[S]) -> Result<Self, DatasetError> {
        let columns = columns.iter().map(|value| value.as_ref().to_string()).collect_vec();
        let mut seen = HashSet::with_capacity(columns.len());
        if let Some(duplicate) = columns.iter().find(|value| !seen.insert(value.as_str())) {
            return Err(SchemaError::DuplicateColumn(duplicate.clone()).into())
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for (row, record) in reader.byte_records().enumerate() {
            let record = record?;
            if record.len() != columns.len() {
                return Err(SchemaError::FieldCount { row, expected: columns.len(), got: record.len() }.into())
            }
            rows.push(
                record.iter()
                    .map(|field| decode_latin1(field).into_owned())
                    .collect_vec()
            );
        }

        log::info!("Loaded {} rows with the columns {}.", rows.len(), columns.iter().join(", "));
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|value| value == name)
    }

    /// Removes the columns [names]. If one of them does not exist nothing is removed.
    pub fn remove_columns<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), DatasetError> {
        let mut remove = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            match self.column_index(name) {
                Some(idx) => remove.push(idx),
                None => return Err(SchemaError::UnknownColumn(name.to_string()).into())
            }
        }
        let remove = remove.into_iter().collect::<HashSet<_>>();
        let keep = |(idx, _): &(usize, _)| !remove.contains(idx);

        self.columns = self.columns.drain(..).enumerate().filter(keep).map(|(_, value)| value).collect();
        for row in self.rows.iter_mut() {
            *row = row.drain(..).enumerate().filter(keep).map(|(_, value)| value).collect();
        }
        log::debug!("Removed {} columns, {} remain.", remove.len(), self.columns.len());
        Ok(())
    }

    /// Converts the dataset into records, the [label_column] has to contain integers.
    pub fn into_records(self, label_column: &str, text_column: &str) -> Result<Vec<Record>, DatasetError> {
        let label = self.column_index(label_column)
            .ok_or_else(|| SchemaError::UnknownColumn(label_column.to_string()))?;
        let text = self.column_index(text_column)
            .ok_or_else(|| SchemaError::UnknownColumn(text_column.to_string()))?;
        self.rows
            .into_iter()
            .enumerate()
            .map(|(row, mut fields)| -> Result<Record, DatasetError> {
                let value = fields[label].trim();
                let target = value.parse::<i64>()
                    .map_err(|_| SchemaError::InvalidTarget { row, value: value.to_string() })?;
                Ok(Record { target, text: std::mem::take(&mut fields[text]) })
            })
            .collect()
    }
}


#[cfg(test)]
mod test {
    use std::io::Write;
    use camino_tempfile::NamedUtf8TempFile;
    use super::{Dataset, DatasetError, Record, SchemaError};

    const COLUMNS: [&str; 6] = ["target", "t_id", "created_at", "query", "user", "text"];
    const DROP: [&str; 4] = ["t_id", "created_at", "query", "user"];

    const CSV: &str = "\
\"0\",\"1467810369\",\"Mon Apr 06 22:19:45 PDT 2009\",\"NO_QUERY\",\"_TheSpecialOne_\",\"@switchfoot http://twitpic.com/2y1zl - Awww, that's a bummer.\"
\"4\",\"1467822272\",\"Mon Apr 06 22:22:45 PDT 2009\",\"NO_QUERY\",\"ersle\",\"I LOVE @Health4UandPets u guys r the best!! \"
";

    fn load(data: &[u8]) -> Result<Dataset, DatasetError> {
        Dataset::from_reader(data, &COLUMNS)
    }

    #[test]
    fn loads_rows_without_header(){
        let dataset = load(CSV.as_bytes()).unwrap();
        assert_eq!(2, dataset.len());
        assert_eq!(&COLUMNS.map(str::to_string), dataset.columns());
        assert_eq!(Some(5), dataset.column_index("text"));
        let targets = dataset.into_records("target", "text").unwrap().into_iter().map(|record| record.target).collect::<Vec<_>>();
        assert_eq!(vec![0, 4], targets);
    }

    #[test]
    fn decodes_latin1(){
        let data = b"4,1,date,NO_QUERY,user,caf\xe9 \xe0 la cr\xe8me\n";
        let records = load(data).unwrap().into_records("target", "text").unwrap();
        assert_eq!(vec![Record { target: 4, text: "café à la crème".to_string() }], records);
    }

    #[test]
    fn c1_bytes_stay_control_characters(){
        let data = b"0,1,date,NO_QUERY,user,so\x85tired\x80\n";
        let records = load(data).unwrap().into_records("target", "text").unwrap();
        assert_eq!("so\u{85}tired\u{80}", records[0].text);
        assert_eq!(vec!["so", "tired\u{80}"], records[0].text.split_whitespace().collect::<Vec<_>>());
    }

    #[test]
    fn loads_from_disk(){
        let mut file = NamedUtf8TempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        file.flush().unwrap();
        let dataset = Dataset::load(file.path(), &COLUMNS).unwrap();
        assert_eq!(2, dataset.len());
        assert!(matches!(Dataset::load("does/not/exist.csv", &COLUMNS), Err(DatasetError::Io(_))));
    }

    #[test]
    fn wrong_field_count_is_a_schema_error(){
        let error = load(b"0,1,2,3,4,text\n4,1,2,3,text\n").unwrap_err();
        assert!(matches!(error, DatasetError::Schema(SchemaError::FieldCount { row: 1, expected: 6, got: 5 })));
        let error = Dataset::from_reader(&b""[..], &["a", "b", "a"]).unwrap_err();
        assert!(matches!(error, DatasetError::Schema(SchemaError::DuplicateColumn(name)) if name == "a"));
    }

    #[test]
    fn prunes_columns(){
        let mut dataset = load(CSV.as_bytes()).unwrap();
        dataset.remove_columns(&DROP).unwrap();
        assert_eq!(&["target".to_string(), "text".to_string()], dataset.columns());
        let records = dataset.into_records("target", "text").unwrap();
        assert_eq!(0, records[0].target);
        assert_eq!("I LOVE @Health4UandPets u guys r the best!! ", records[1].text);
    }

    #[test]
    fn pruning_a_missing_column_changes_nothing(){
        let mut dataset = load(CSV.as_bytes()).unwrap();
        let before = dataset.clone();
        let error = dataset.remove_columns(&["t_id", "missing"]).unwrap_err();
        assert!(matches!(error, DatasetError::Schema(SchemaError::UnknownColumn(name)) if name == "missing"));
        assert_eq!(before, dataset);
    }

    #[test]
    fn targets_have_to_be_integers(){
        let dataset = load(b"x,1,2,3,4,text\n").unwrap();
        let error = dataset.into_records("target", "text").unwrap_err();
        assert!(matches!(error, DatasetError::Schema(SchemaError::InvalidTarget { row: 0, .. })));
        let dataset = load(CSV.as_bytes()).unwrap();
        assert!(matches!(
            dataset.into_records("label", "text"),
            Err(DatasetError::Schema(SchemaError::UnknownColumn(_)))
        ));
    }
}
