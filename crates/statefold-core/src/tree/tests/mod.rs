mod planner_core_tests;
