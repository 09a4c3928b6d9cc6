use crate::engine::domain::{Client, DataSet, Task, Worker};

pub(crate) fn client(id: &str, priority: i64) -> Client {
    Client {
        client_id: id.to_string(),
        client_name: format!("Client {id}"),
        priority_level: priority,
        requested_task_ids: Vec::new(),
        group_tag: "default".to_string(),
        attributes_json: String::new(),
    }
}

pub(crate) fn worker(id: &str, skills: &[&str], slots: &[i64], max_load: i64) -> Worker {
    Worker {
        worker_id: id.to_string(),
        worker_name: format!("Worker {id}"),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        available_slots: slots.to_vec(),
        max_load_per_phase: max_load,
        worker_group: "crew".to_string(),
        qualification_level: 1,
    }
}

pub(crate) fn task(id: &str, skills: &[&str], duration: i64) -> Task {
    Task {
        task_id: id.to_string(),
        task_name: format!("Task {id}"),
        category: "general".to_string(),
        duration,
        required_skills: skills.iter().map(|s| s.to_string()).collect(),
        preferred_phases: vec![1],
        max_concurrent: 1,
    }
}

pub(crate) fn dataset(clients: Vec<Client>, workers: Vec<Worker>, tasks: Vec<Task>) -> DataSet {
    DataSet {
        clients,
        workers,
        tasks,
    }
}
