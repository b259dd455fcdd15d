use grid_astar::{Cell, CostTable, Pathfinder, Scenario};

// Solves the default board
//  ________
// |S       |
// |        |
// |        |
// |        |
// |    ####|
// |       G|
// |        |
// |        |
//  ________
// and prints the path together with the f cost of every cell the search annotated.

fn main() {
    let scenario = Scenario::default();
    println!("{}", scenario);
    let mut costs = CostTable::new();
    let path = scenario
        .find_path_with(&Pathfinder::default(), Some(&mut costs))
        .unwrap();
    println!("{}", scenario.render(&path));
    println!("Path:");
    for p in &path {
        println!("{:?}", p);
    }
    println!("\nf costs:");
    for y in 0..scenario.height {
        let row = (0..scenario.width)
            .map(|x| match costs.get(&Cell::new(x, y)) {
                Some(c) => format!("{:>3.0}", c.f_cost),
                None => "  -".to_owned(),
            })
            .collect::<String>();
        println!("{}", row);
    }
}
