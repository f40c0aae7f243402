mod layout;
mod topologies;
mod workload_plan;
