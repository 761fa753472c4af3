//! Location hierarchy service
//!
//! Loads location records from JSON sources and answers hierarchy queries.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    DomainError, LocationDocument, LocationIndex, LocationRecord, LocationTree, ReferenceParser,
    TreeBuilder,
};
use crate::infrastructure::traits::FileSystem;

/// Extension of location source files inside a directory.
pub const SOURCE_EXTENSION: &str = "json";

/// Service for loading location records and resolving their hierarchy.
pub struct LocationService {
    fs: Arc<dyn FileSystem>,
    parser: ReferenceParser,
}

impl LocationService {
    /// Create a service resolving `Location/<id>` references.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self::with_parser(fs, ReferenceParser::default())
    }

    pub fn with_parser(fs: Arc<dyn FileSystem>, parser: ReferenceParser) -> Self {
        Self { fs, parser }
    }

    pub fn parser(&self) -> &ReferenceParser {
        &self.parser
    }

    /// Load all records from a file, or from every `*.json` file below a directory.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, source: &Path) -> ApplicationResult<Vec<LocationRecord>> {
        if !self.fs.exists(source) {
            return Err(DomainError::SourceNotFound(source.to_path_buf()).into());
        }

        let files = if self.fs.is_dir(source) {
            self.fs
                .list_files(source, SOURCE_EXTENSION)
                .with_path_context("list location files", source)?
        } else {
            vec![source.to_path_buf()]
        };
        debug!("loading {} location files", files.len());

        let mut records = Vec::new();
        for file in &files {
            records.extend(self.load_file(file)?);
        }
        debug!("loaded {} location records", records.len());
        Ok(records)
    }

    fn load_file(&self, path: &Path) -> ApplicationResult<Vec<LocationRecord>> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read location file", path)?;
        let document: LocationDocument =
            serde_json::from_str(&content).with_path_context("parse location file", path)?;
        let records = document
            .into_records(&self.parser)
            .with_path_context("parse location file", path)?;

        for record in &records {
            if record.id.as_str().trim().is_empty() {
                return Err(DomainError::InvalidRecord {
                    path: path.to_path_buf(),
                    message: "empty id".to_string(),
                }
                .into());
            }
        }
        Ok(records)
    }

    /// Descendants of `root` in level order.
    pub fn children(&self, source: &Path, root: &str) -> ApplicationResult<Vec<LocationRecord>> {
        let records = self.load(source)?;
        let index = LocationIndex::with_parser(&records, &self.parser);
        Ok(index.descendants(root).into_iter().cloned().collect())
    }

    /// Subtree of `root`, or the whole forest without a root.
    #[instrument(level = "debug", skip(self))]
    pub fn tree(&self, source: &Path, root: Option<&str>) -> ApplicationResult<Vec<LocationTree>> {
        let records = self.load(source)?;
        let index = LocationIndex::with_parser(&records, &self.parser);
        let mut builder = TreeBuilder::new();

        match root {
            Some(root) => builder
                .build_tree(&index, root)
                .map(|tree| vec![tree])
                .ok_or_else(|| {
                    ApplicationError::from(DomainError::UnknownLocation(root.to_string()))
                }),
            None => Ok(builder.build_forest(&index)?),
        }
    }

    /// Descendants of `root` that have no children.
    pub fn leaves(&self, source: &Path, root: &str) -> ApplicationResult<Vec<LocationRecord>> {
        let records = self.load(source)?;
        let index = LocationIndex::with_parser(&records, &self.parser);
        Ok(index.leaves(root).into_iter().cloned().collect())
    }

    /// Parent chain of `id`, nearest first.
    pub fn ancestors(&self, source: &Path, id: &str) -> ApplicationResult<Vec<LocationRecord>> {
        let records = self.load(source)?;
        let index = LocationIndex::with_parser(&records, &self.parser);
        if !index.contains(id) {
            return Err(ApplicationError::Domain(DomainError::UnknownLocation(
                id.to_string(),
            )));
        }
        Ok(index.ancestors(id).into_iter().cloned().collect())
    }

    /// Records without a resolvable parent.
    pub fn roots(&self, source: &Path) -> ApplicationResult<Vec<LocationRecord>> {
        let records = self.load(source)?;
        let index = LocationIndex::with_parser(&records, &self.parser);
        Ok(index.roots().into_iter().cloned().collect())
    }
}
