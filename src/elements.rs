//! # 元素参考表模块
//!
//! 元素符号 / 原子序数 / 相对原子质量的只读查询表。
//! 作为显式注入的数据依赖传入各构造函数，不使用全局状态，
//! 便于在测试中替换。
//!
//! ## 依赖关系
//! - 被 `models/`, `parsers/`, `symmetry.rs` 使用
//! - 无外部模块依赖

/// 单个元素条目：(原子序数, 符号, 英文名, 相对原子质量)
///
/// 没有稳定同位素的元素质量为 `None`。
type ElementEntry = (i32, &'static str, &'static str, Option<f64>);

/// 元素参考表
///
/// 索引即原子序数（0 号为占位符 "X"）。
#[derive(Debug, Clone, Copy)]
pub struct ElementTable {
    entries: &'static [ElementEntry],
}

impl ElementTable {
    /// 标准元素表（1-118 号）
    pub fn standard() -> Self {
        ElementTable {
            entries: &ELEMENT_DATA,
        }
    }

    /// 符号 -> 原子序数；未知符号返回 `None`（非致命）
    pub fn number_of(&self, symbol: &str) -> Option<i32> {
        self.entries
            .iter()
            .skip(1)
            .find(|e| e.1 == symbol)
            .map(|e| e.0)
    }

    /// 原子序数 -> 符号
    pub fn symbol_of(&self, number: i32) -> Option<&'static str> {
        if number < 0 {
            return None;
        }
        self.entries.get(number as usize).map(|e| e.1)
    }

    /// 符号 -> 相对原子质量 (amu)；未知符号或无稳定同位素返回 `None`
    pub fn mass_of(&self, symbol: &str) -> Option<f64> {
        self.entries
            .iter()
            .skip(1)
            .find(|e| e.1 == symbol)
            .and_then(|e| e.3)
    }

    /// 符号是否在表中
    pub fn contains(&self, symbol: &str) -> bool {
        self.number_of(symbol).is_some()
    }
}

/// 元素数据，索引 == 原子序数
static ELEMENT_DATA: [ElementEntry; 119] = [
    (0, "X", "X", None),
    (1, "H", "Hydrogen", Some(1.00794)),
    (2, "He", "Helium", Some(4.002602)),
    (3, "Li", "Lithium", Some(6.941)),
    (4, "Be", "Beryllium", Some(9.012182)),
    (5, "B", "Boron", Some(10.811)),
    (6, "C", "Carbon", Some(12.0107)),
    (7, "N", "Nitrogen", Some(14.0067)),
    (8, "O", "Oxygen", Some(15.9994)),
    (9, "F", "Fluorine", Some(18.9984032)),
    (10, "Ne", "Neon", Some(20.1797)),
    (11, "Na", "Sodium", Some(22.98976928)),
    (12, "Mg", "Magnesium", Some(24.3050)),
    (13, "Al", "Aluminium", Some(26.9815386)),
    (14, "Si", "Silicon", Some(28.0855)),
    (15, "P", "Phosphorus", Some(30.973762)),
    (16, "S", "Sulfur", Some(32.065)),
    (17, "Cl", "Chlorine", Some(35.453)),
    (18, "Ar", "Argon", Some(39.948)),
    (19, "K", "Potassium", Some(39.0983)),
    (20, "Ca", "Calcium", Some(40.078)),
    (21, "Sc", "Scandium", Some(44.955912)),
    (22, "Ti", "Titanium", Some(47.867)),
    (23, "V", "Vanadium", Some(50.9415)),
    (24, "Cr", "Chromium", Some(51.9961)),
    (25, "Mn", "Manganese", Some(54.938045)),
    (26, "Fe", "Iron", Some(55.845)),
    (27, "Co", "Cobalt", Some(58.933195)),
    (28, "Ni", "Nickel", Some(58.6934)),
    (29, "Cu", "Copper", Some(63.546)),
    (30, "Zn", "Zinc", Some(65.38)),
    (31, "Ga", "Gallium", Some(69.723)),
    (32, "Ge", "Germanium", Some(72.64)),
    (33, "As", "Arsenic", Some(74.92160)),
    (34, "Se", "Selenium", Some(78.96)),
    (35, "Br", "Bromine", Some(79.904)),
    (36, "Kr", "Krypton", Some(83.798)),
    (37, "Rb", "Rubidium", Some(85.4678)),
    (38, "Sr", "Strontium", Some(87.62)),
    (39, "Y", "Yttrium", Some(88.90585)),
    (40, "Zr", "Zirconium", Some(91.224)),
    (41, "Nb", "Niobium", Some(92.90638)),
    (42, "Mo", "Molybdenum", Some(95.96)),
    (43, "Tc", "Technetium", None),
    (44, "Ru", "Ruthenium", Some(101.07)),
    (45, "Rh", "Rhodium", Some(102.90550)),
    (46, "Pd", "Palladium", Some(106.42)),
    (47, "Ag", "Silver", Some(107.8682)),
    (48, "Cd", "Cadmium", Some(112.411)),
    (49, "In", "Indium", Some(114.818)),
    (50, "Sn", "Tin", Some(118.710)),
    (51, "Sb", "Antimony", Some(121.760)),
    (52, "Te", "Tellurium", Some(127.60)),
    (53, "I", "Iodine", Some(126.90447)),
    (54, "Xe", "Xenon", Some(131.293)),
    (55, "Cs", "Caesium", Some(132.9054519)),
    (56, "Ba", "Barium", Some(137.327)),
    (57, "La", "Lanthanum", Some(138.90547)),
    (58, "Ce", "Cerium", Some(140.116)),
    (59, "Pr", "Praseodymium", Some(140.90765)),
    (60, "Nd", "Neodymium", Some(144.242)),
    (61, "Pm", "Promethium", None),
    (62, "Sm", "Samarium", Some(150.36)),
    (63, "Eu", "Europium", Some(151.964)),
    (64, "Gd", "Gadolinium", Some(157.25)),
    (65, "Tb", "Terbium", Some(158.92535)),
    (66, "Dy", "Dysprosium", Some(162.500)),
    (67, "Ho", "Holmium", Some(164.93032)),
    (68, "Er", "Erbium", Some(167.259)),
    (69, "Tm", "Thulium", Some(168.93421)),
    (70, "Yb", "Ytterbium", Some(173.054)),
    (71, "Lu", "Lutetium", Some(174.9668)),
    (72, "Hf", "Hafnium", Some(178.49)),
    (73, "Ta", "Tantalum", Some(180.94788)),
    (74, "W", "Tungsten", Some(183.84)),
    (75, "Re", "Rhenium", Some(186.207)),
    (76, "Os", "Osmium", Some(190.23)),
    (77, "Ir", "Iridium", Some(192.217)),
    (78, "Pt", "Platinum", Some(195.084)),
    (79, "Au", "Gold", Some(196.966569)),
    (80, "Hg", "Mercury", Some(200.59)),
    (81, "Tl", "Thallium", Some(204.3833)),
    (82, "Pb", "Lead", Some(207.2)),
    (83, "Bi", "Bismuth", Some(208.98040)),
    (84, "Po", "Polonium", None),
    (85, "At", "Astatine", None),
    (86, "Rn", "Radon", None),
    (87, "Fr", "Francium", None),
    (88, "Ra", "Radium", None),
    (89, "Ac", "Actinium", None),
    (90, "Th", "Thorium", Some(232.03806)),
    (91, "Pa", "Protactinium", Some(231.03588)),
    (92, "U", "Uranium", Some(238.02891)),
    (93, "Np", "Neptunium", None),
    (94, "Pu", "Plutonium", None),
    (95, "Am", "Americium", None),
    (96, "Cm", "Curium", None),
    (97, "Bk", "Berkelium", None),
    (98, "Cf", "Californium", None),
    (99, "Es", "Einsteinium", None),
    (100, "Fm", "Fermium", None),
    (101, "Md", "Mendelevium", None),
    (102, "No", "Nobelium", None),
    (103, "Lr", "Lawrencium", None),
    (104, "Rf", "Rutherfordium", None),
    (105, "Db", "Dubnium", None),
    (106, "Sg", "Seaborgium", None),
    (107, "Bh", "Bohrium", None),
    (108, "Hs", "Hassium", None),
    (109, "Mt", "Meitnerium", None),
    (110, "Ds", "Darmstadtium", None),
    (111, "Rg", "Roentgenium", None),
    (112, "Cn", "Copernicium", None),
    (113, "Uut", "Ununtrium", None),
    (114, "Uuq", "Ununquadium", None),
    (115, "Uup", "Ununpentium", None),
    (116, "Uuh", "Ununhexium", None),
    (117, "Uus", "Ununseptium", None),
    (118, "Uuo", "Ununoctium", None),
];
