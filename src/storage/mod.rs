//!  Storage is organized through [object_store::FileObjectStore].
//!  The basic idea is:
//!   - There is a directory with one JSON file per stored object, named by its object id.
//!   - Every object carries a version so old layouts can be recognized.
//!   - Named counters hand out sequential ids, one small file per counter.
//!   - A lock file in the store directory serializes writers across processes.
//!
//!  Tasks reach the store only through [task_store::TaskStore].

pub mod entities;
pub mod object_store;
pub mod task_store;
