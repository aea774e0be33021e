//! 测试用的内存存储、脚本化容器检查器和命令执行器

use crate::container::{CommandRunner, WorkloadInspector};
use crate::storage::RemoteStore;
use crate::target::WorkloadMetadata;
use crate::{DumpError, Result};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct MemoryStoreState {
    objects: BTreeMap<String, Vec<u8>>,
    put_count: usize,
    delete_batches: Vec<Vec<String>>,
    fail_list: bool,
    put_status: Option<u16>,
    delete_status: Option<u16>,
}

/// 内存对象存储，克隆后共享同一份数据
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryStore {
    state: Arc<Mutex<MemoryStoreState>>,
}

impl MemoryStore {
    pub fn with_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let store = Self::default();
        {
            let mut state = store.state.lock().unwrap();
            for key in keys {
                state.objects.insert(key.into(), Vec::new());
            }
        }
        store
    }

    pub fn fail_list(&self) {
        self.state.lock().unwrap().fail_list = true;
    }

    pub fn set_put_status(&self, status: u16) {
        self.state.lock().unwrap().put_status = Some(status);
    }

    pub fn set_delete_status(&self, status: u16) {
        self.state.lock().unwrap().delete_status = Some(status);
    }

    pub fn put_count(&self) -> usize {
        self.state.lock().unwrap().put_count
    }

    pub fn delete_batches(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().delete_batches.clone()
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().objects.get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.state.lock().unwrap().objects.keys().cloned().collect()
    }
}

impl RemoteStore for MemoryStore {
    async fn list(&self) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        if state.fail_list {
            return Err(DumpError::Status(503));
        }
        Ok(state.objects.keys().cloned().collect())
    }

    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<u16> {
        let mut state = self.state.lock().unwrap();
        state.put_count += 1;
        if let Some(status) = state.put_status {
            return Ok(status);
        }
        state.objects.insert(key.to_string(), bytes);
        Ok(200)
    }

    async fn delete_many(&self, keys: &[String]) -> Result<u16> {
        let mut state = self.state.lock().unwrap();
        state.delete_batches.push(keys.to_vec());
        if let Some(status) = state.delete_status {
            return Ok(status);
        }
        for key in keys {
            state.objects.remove(key);
        }
        Ok(204)
    }
}

#[derive(Debug, Default)]
struct RunnerState {
    calls: Vec<(String, Vec<String>, PathBuf)>,
    failing: HashSet<String>,
}

/// 记录调用的命令执行器，失败时会留下半截文件
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedRunner {
    state: Arc<Mutex<RunnerState>>,
}

impl ScriptedRunner {
    pub fn fail_for(&self, workload_id: &str) {
        self.state
            .lock()
            .unwrap()
            .failing
            .insert(workload_id.to_string());
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>, PathBuf)> {
        self.state.lock().unwrap().calls.clone()
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, workload_id: &str, command: &[String], redirect_to: &Path) -> Result<()> {
        let failing = {
            let mut state = self.state.lock().unwrap();
            state.calls.push((
                workload_id.to_string(),
                command.to_vec(),
                redirect_to.to_path_buf(),
            ));
            state.failing.contains(workload_id)
        };

        if failing {
            tokio::fs::write(redirect_to, b"-- partial").await?;
            return Err(DumpError::docker(format!("{workload_id}: exit status 1")));
        }

        tokio::fs::write(redirect_to, format!("-- dump of {workload_id}\n")).await?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct InspectorState {
    records: Vec<WorkloadMetadata>,
    fail: bool,
}

/// 返回固定容器列表的检查器
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedInspector {
    state: Arc<Mutex<InspectorState>>,
}

impl ScriptedInspector {
    pub fn new(records: Vec<WorkloadMetadata>) -> Self {
        Self {
            state: Arc::new(Mutex::new(InspectorState {
                records,
                fail: false,
            })),
        }
    }

    pub fn fail(&self) {
        self.state.lock().unwrap().fail = true;
    }
}

impl WorkloadInspector for ScriptedInspector {
    async fn list_candidates(&self) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        if state.fail {
            return Err(DumpError::docker("Docker 服务未运行"));
        }
        Ok(state.records.iter().map(|r| r.id.clone()).collect())
    }

    async fn describe(&self, ids: &[String]) -> Result<Vec<WorkloadMetadata>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .records
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }
}
