//! Python bindings for parsetree
//!
//! Thin PyO3 wrappers over the tree, its traversals and the treebank readers.
//! Nodes and relations are handed to Python as owned snapshots.

use pyo3::exceptions::{PyIOError, PyIndexError, PyNotImplementedError, PyValueError};
use pyo3::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::TreeError;
use crate::node::Node as RustNode;
use crate::relation::Relation as RustRelation;
use crate::text::TextOptions;
use crate::tree::Tree as RustTree;
use crate::treebank::Treebank;

/// Convert TreeError to Python exception
impl From<TreeError> for PyErr {
    fn from(err: TreeError) -> PyErr {
        match err {
            TreeError::Io(e) => PyIOError::new_err(e.to_string()),
            TreeError::NotSupported { .. } => PyNotImplementedError::new_err(err.to_string()),
            TreeError::MissingNode(_) => PyIndexError::new_err(err.to_string()),
            TreeError::AtLine { line, source } => match *source {
                TreeError::Io(e) => PyIOError::new_err(format!("line {}: {}", line, e)),
                other => PyValueError::new_err(format!("line {}: {}", line, other)),
            },
            other => PyValueError::new_err(other.to_string()),
        }
    }
}

#[pyclass(name = "Node")]
#[derive(Clone)]
pub struct PyNode {
    inner: RustNode,
}

#[pymethods]
impl PyNode {
    #[getter]
    fn id(&self) -> usize {
        self.inner.id
    }

    #[getter]
    fn tag(&self) -> String {
        self.inner.tag.clone()
    }

    #[getter]
    fn role(&self) -> Option<String> {
        self.inner.data.role().map(str::to_string)
    }

    #[getter]
    fn pos(&self) -> Option<String> {
        self.inner.data.pos().map(str::to_string)
    }

    #[getter]
    fn word(&self) -> Option<String> {
        self.inner.data.word().map(str::to_string)
    }

    #[getter]
    fn parent_id(&self) -> Option<usize> {
        self.inner.parent_id()
    }

    #[getter]
    fn children_ids(&self) -> Vec<usize> {
        self.inner.children_ids().to_vec()
    }

    fn is_leaf(&self) -> bool {
        self.inner.is_leaf()
    }

    fn __repr__(&self) -> String {
        format!("<Node id={} tag='{}'>", self.inner.id, self.inner.tag)
    }
}

impl From<&RustNode> for PyNode {
    fn from(node: &RustNode) -> Self {
        PyNode {
            inner: node.clone(),
        }
    }
}

#[pyclass(name = "Relation")]
pub struct PyRelation {
    #[pyo3(get)]
    head: PyNode,
    #[pyo3(get)]
    tail: PyNode,
    #[pyo3(get)]
    relation: PyNode,
}

#[pymethods]
impl PyRelation {
    #[getter]
    fn head_first(&self) -> bool {
        self.head.inner.id <= self.tail.inner.id
    }

    /// The relation label (role of the relation node)
    #[getter]
    fn label(&self) -> Option<String> {
        self.relation.role()
    }

    fn __repr__(&self) -> String {
        RustRelation::new(&self.head.inner, &self.tail.inner, &self.relation.inner).to_string()
    }
}

impl From<RustRelation<'_>> for PyRelation {
    fn from(relation: RustRelation<'_>) -> Self {
        PyRelation {
            head: relation.head.into(),
            tail: relation.tail.into(),
            relation: relation.relation.into(),
        }
    }
}

/// A parsed constituency tree.
#[pyclass(name = "Tree")]
#[derive(Clone)]
pub struct PyTree {
    pub(crate) inner: Arc<RustTree>,
}

#[pymethods]
impl PyTree {
    /// Parse a tree from bracketed text such as 'S(Head:Nab:中文字|particle:Td:耶)'.
    ///
    /// Args:
    ///     text: bracketed tree text
    ///     normalize: strip enumeration prefix and trailing '#' first
    ///
    /// Raises:
    ///     ValueError: If the text is malformed
    #[staticmethod]
    #[pyo3(signature = (text, normalize=true))]
    fn from_text(text: &str, normalize: bool) -> PyResult<Self> {
        let tree = RustTree::from_text_with(text, TextOptions { normalize })?;
        Ok(PyTree {
            inner: Arc::new(tree),
        })
    }

    /// Load a tree from its JSON dict form.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        Ok(PyTree {
            inner: Arc::new(RustTree::from_json(json)?),
        })
    }

    #[pyo3(signature = (node_id=None))]
    fn to_text(&self, node_id: Option<usize>) -> PyResult<String> {
        match node_id {
            Some(id) => Ok(self.inner.to_text_at(id)?),
            None => Ok(self.inner.to_text()),
        }
    }

    #[pyo3(signature = (node_id=None))]
    fn to_json(&self, node_id: Option<usize>) -> PyResult<String> {
        match node_id {
            Some(id) => Ok(self.inner.to_json_at(id)?),
            None => Ok(self.inner.to_json()?),
        }
    }

    fn to_list(&self) -> PyResult<Vec<String>> {
        use crate::format::ListFormat;
        Ok(self.inner.to_list()?)
    }

    #[pyo3(signature = (idhidden=true))]
    fn show(&self, idhidden: bool) -> String {
        self.inner.show(idhidden)
    }

    #[getter]
    fn root_id(&self) -> Option<usize> {
        self.inner.root_id()
    }

    fn node(&self, id: usize) -> PyResult<PyNode> {
        self.inner
            .get(id)
            .map(PyNode::from)
            .ok_or_else(|| TreeError::MissingNode(id).into())
    }

    fn __getitem__(&self, id: usize) -> PyResult<PyNode> {
        self.node(id)
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    /// Children of a node with the given role; None selects children without a role.
    #[pyo3(signature = (node_id, role=None))]
    fn children(&self, node_id: usize, role: Option<&str>) -> Vec<PyNode> {
        self.inner
            .get_children(node_id, role)
            .map(PyNode::from)
            .collect()
    }

    /// Head nodes of a subtree.
    ///
    /// Args:
    ///     root_id: subtree root (tree root by default)
    ///     semantic: prefer DUMMY/head over the syntactic Head
    ///     deep: follow heads down to the words
    #[pyo3(signature = (root_id=None, semantic=true, deep=true))]
    fn heads(&self, root_id: Option<usize>, semantic: bool, deep: bool) -> Vec<PyNode> {
        self.inner
            .get_heads(root_id, semantic, deep)
            .map(PyNode::from)
            .collect()
    }

    #[pyo3(signature = (root_id=None, semantic=true))]
    fn relations(&self, root_id: Option<usize>, semantic: bool) -> Vec<PyRelation> {
        self.inner
            .get_relations(root_id, semantic)
            .map(PyRelation::from)
            .collect()
    }

    #[pyo3(signature = (root_id=None, semantic=true, deep=true))]
    fn subjects(&self, root_id: Option<usize>, semantic: bool, deep: bool) -> Vec<PyNode> {
        self.inner
            .get_subjects(root_id, semantic, deep)
            .map(PyNode::from)
            .collect()
    }

    fn __str__(&self) -> String {
        self.inner.to_text()
    }

    fn __repr__(&self) -> String {
        format!("<Tree len={} text='{}'>", self.inner.len(), self.inner.to_text())
    }
}

/// A collection of parsed trees from files or strings, one tree per line.
#[pyclass(name = "Treebank")]
#[derive(Clone)]
pub struct PyTreebank {
    inner: Treebank,
}

#[pymethods]
impl PyTreebank {
    /// Create a Treebank from a string.
    #[staticmethod]
    fn from_string(text: &str) -> Self {
        PyTreebank {
            inner: Treebank::from_string(text),
        }
    }

    /// Create a Treebank from a file.
    ///
    /// Automatically handles gzip-compressed files (.gz).
    #[staticmethod]
    fn from_file(file_path: &str) -> Self {
        PyTreebank {
            inner: Treebank::from_file(PathBuf::from(file_path)),
        }
    }

    /// Read several treebank files in order.
    #[staticmethod]
    fn from_files(file_paths: Vec<String>) -> Self {
        let path_bufs: Vec<PathBuf> = file_paths.iter().map(PathBuf::from).collect();
        PyTreebank {
            inner: Treebank::from_paths(path_bufs),
        }
    }

    /// Create a Treebank from files matching a glob pattern.
    ///
    /// Raises:
    ///     ValueError: If the pattern does not parse
    #[staticmethod]
    fn from_glob(pattern: &str) -> PyResult<Self> {
        Treebank::from_glob(pattern)
            .map(|inner| PyTreebank { inner })
            .map_err(|e| PyValueError::new_err(format!("Glob pattern error: {}", e)))
    }

    /// Iterate over all trees; raises on the first unreadable line.
    fn trees(&self) -> PyTreeIterator {
        PyTreeIterator {
            inner: self.inner.try_iter(),
        }
    }

    fn __repr__(&self) -> String {
        "<Treebank>".to_string()
    }
}

/// Python iterator yielding one Tree per treebank line.
#[pyclass(name = "TreeIterator", unsendable)]
struct PyTreeIterator {
    inner: Box<dyn Iterator<Item = Result<RustTree, TreeError>> + Send>,
}

#[pymethods]
impl PyTreeIterator {
    fn __iter__(slf: PyRef<Self>) -> PyRef<Self> {
        slf
    }

    fn __next__(&mut self) -> PyResult<Option<PyTree>> {
        match self.inner.next() {
            Some(Ok(tree)) => Ok(Some(PyTree {
                inner: Arc::new(tree),
            })),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }
}

/// Strip the enumeration prefix and trailing '#' from tree text.
#[pyfunction]
fn normalize_text(text: &str) -> String {
    crate::text::normalize_text(text).to_string()
}

#[pyfunction]
fn __version__() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[pymodule]
fn parsetree(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTree>()?;
    m.add_class::<PyNode>()?;
    m.add_class::<PyRelation>()?;
    m.add_class::<PyTreebank>()?;
    m.add_class::<PyTreeIterator>()?;

    m.add_function(wrap_pyfunction!(normalize_text, m)?)?;
    m.add_function(wrap_pyfunction!(__version__, m)?)?;

    Ok(())
}
