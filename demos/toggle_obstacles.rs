use grid_astar::{Cell, Scenario};

// Edits the default board between queries like the interactive board does: cells on row 4 are
// toggled until the wall is closed, then every obstacle is cleared.

fn main() {
    let mut scenario = Scenario::default();
    for x in (0..4).rev() {
        scenario.toggle_obstacle(Cell::new(x, 4));
        let path = scenario.find_path().unwrap();
        println!("{}", scenario.render(&path));
        if path.is_empty() {
            println!("No path, reachable: {}\n", scenario.reachable());
        } else {
            println!("Path of {} cells\n", path.len());
        }
    }
    scenario.clear_obstacles();
    let path = scenario.find_path().unwrap();
    println!("{}", scenario.render(&path));
    println!("Path of {} cells", path.len());
}
