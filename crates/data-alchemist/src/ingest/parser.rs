use super::mapping::map_columns;
use super::IngestError;
use crate::engine::domain::{Client, EntityKind, Task, Worker};
use std::io::Read;

pub fn read_clients<R: Read>(reader: R) -> Result<Vec<Client>, IngestError> {
    read_rows(reader, EntityKind::Clients, |row| {
        let mut client = Client::default();
        for (field, value) in row {
            match *field {
                "ClientID" => client.client_id = value.to_string(),
                "ClientName" => client.client_name = value.to_string(),
                "PriorityLevel" => client.priority_level = parse_int_or(value, 1),
                "RequestedTaskIDs" => client.requested_task_ids = split_list(value),
                "GroupTag" => client.group_tag = value.to_string(),
                "AttributesJSON" => client.attributes_json = value.to_string(),
                _ => {}
            }
        }
        client
    })
}

pub fn read_workers<R: Read>(reader: R) -> Result<Vec<Worker>, IngestError> {
    read_rows(reader, EntityKind::Workers, |row| {
        let mut worker = Worker::default();
        for (field, value) in row {
            match *field {
                "WorkerID" => worker.worker_id = value.to_string(),
                "WorkerName" => worker.worker_name = value.to_string(),
                "Skills" => worker.skills = split_list(value),
                "AvailableSlots" => worker.available_slots = parse_int_list(value),
                "MaxLoadPerPhase" => worker.max_load_per_phase = parse_int_or(value, 1),
                "WorkerGroup" => worker.worker_group = value.to_string(),
                "QualificationLevel" => worker.qualification_level = parse_int_or(value, 1),
                _ => {}
            }
        }
        worker
    })
}

pub fn read_tasks<R: Read>(reader: R) -> Result<Vec<Task>, IngestError> {
    read_rows(reader, EntityKind::Tasks, |row| {
        let mut task = Task::default();
        for (field, value) in row {
            match *field {
                "TaskID" => task.task_id = value.to_string(),
                "TaskName" => task.task_name = value.to_string(),
                "Category" => task.category = value.to_string(),
                "Duration" => task.duration = parse_int_or(value, 1),
                "RequiredSkills" => task.required_skills = split_list(value),
                "PreferredPhases" => task.preferred_phases = parse_int_list(value),
                "MaxConcurrent" => task.max_concurrent = parse_int_or(value, 1),
                _ => {}
            }
        }
        task
    })
}

fn read_rows<R, T, F>(reader: R, entity: EntityKind, mut build: F) -> Result<Vec<T>, IngestError>
where
    R: Read,
    F: FnMut(&[(&str, &str)]) -> T,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|source| IngestError::Csv { entity, source })?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.is_empty() {
        return Err(IngestError::MissingHeader { entity });
    }

    let mapping = map_columns(&headers, entity);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|source| IngestError::Csv { entity, source })?;
        let fields: Vec<(&str, &str)> = headers
            .iter()
            .enumerate()
            .filter_map(|(position, header)| {
                let canonical = mapping.get(header)?;
                let value = record.get(position)?;
                Some((canonical.as_str(), value))
            })
            .collect();
        rows.push(build(&fields));
    }

    Ok(rows)
}

/// Comma-separated text into trimmed, non-empty string entries.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Comma lists (`1,2,3`) or range syntax (`1-3`) into integers. Entries
/// that fail to parse are dropped.
fn parse_int_list(value: &str) -> Vec<i64> {
    let trimmed = value.trim();
    if let Some((start, end)) = trimmed.split_once('-') {
        if let (Ok(start), Ok(end)) = (start.trim().parse::<i64>(), end.trim().parse::<i64>()) {
            if start <= end {
                return (start..=end).collect();
            }
        }
    }

    trimmed
        .split(',')
        .filter_map(|entry| entry.trim().parse::<i64>().ok())
        .collect()
}

fn parse_int_or(value: &str, default: i64) -> i64 {
    value.trim().parse::<i64>().unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_clients_with_canonical_headers() {
        let csv = "ClientID,ClientName,PriorityLevel,RequestedTaskIDs,GroupTag,AttributesJSON\n\
                   C001,Acme,3,\"T001,T002\",alpha,{}\n";
        let clients = read_clients(csv.as_bytes()).expect("clients parse");
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].client_id, "C001");
        assert_eq!(clients[0].priority_level, 3);
        assert_eq!(
            clients[0].requested_task_ids,
            vec!["T001".to_string(), "T002".to_string()]
        );
    }

    #[test]
    fn reads_workers_with_renamed_headers() {
        let csv = "worker_id,expertise,available slots,max load\n\
                   W001,\"welding, plumbing\",\"1,2,3\",2\n";
        let workers = read_workers(csv.as_bytes()).expect("workers parse");
        assert_eq!(workers[0].worker_id, "W001");
        assert_eq!(workers[0].skills, vec!["welding", "plumbing"]);
        assert_eq!(workers[0].available_slots, vec![1, 2, 3]);
        assert_eq!(workers[0].max_load_per_phase, 2);
    }

    #[test]
    fn preferred_phase_ranges_expand() {
        let csv = "TaskID,TaskName,Duration,PreferredPhases,MaxConcurrent\n\
                   T001,Build,2,1-3,1\n\
                   T002,Test,bogus,\"2,4\",1\n";
        let tasks = read_tasks(csv.as_bytes()).expect("tasks parse");
        assert_eq!(tasks[0].preferred_phases, vec![1, 2, 3]);
        assert_eq!(tasks[1].preferred_phases, vec![2, 4]);
        // Unparseable numbers degrade to the default, for the validator to
        // judge.
        assert_eq!(tasks[1].duration, 1);
    }

    #[test]
    fn unmapped_columns_leave_defaults() {
        let csv = "mystery,TaskID\nx,T001\n";
        let tasks = read_tasks(csv.as_bytes()).expect("tasks parse");
        assert_eq!(tasks[0].task_id, "T001");
        assert_eq!(tasks[0].duration, 0);
        assert!(tasks[0].task_name.is_empty());
    }
}
